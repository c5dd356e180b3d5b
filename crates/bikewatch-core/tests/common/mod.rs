#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Drivers that run one event through engine + store the way a service does

use bikewatch_core::assignment_engine::{
    on_case_reported, on_case_resolved, on_officer_added, on_officer_removed,
};
use bikewatch_core::model::{NewCase, NewCitizen, NewOfficer};
use bikewatch_core::rules::invariants;
use bikewatch_core::{
    Case, CaseId, CitizenId, EntityStore, ExErrorKind, ExResult, MemoryStore, Officer, OfficerId,
    Transition,
};

pub const MAX_ATTEMPTS: usize = 3;

/// Recompute and apply until the apply does not conflict
pub fn apply_with_retry(
    store: &dyn EntityStore,
    plan: impl Fn(&dyn EntityStore) -> ExResult<Transition>,
) -> ExResult<Transition> {
    let mut attempt = 1;
    loop {
        let transition = plan(store)?;
        match store.apply_transition(&transition) {
            Ok(()) => return Ok(transition),
            Err(e) if e.kind() == ExErrorKind::Conflict && attempt < MAX_ATTEMPTS => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

pub fn register_citizen(store: &dyn EntityStore, email: &str) -> CitizenId {
    store
        .create_citizen(NewCitizen {
            name: "Citizen".to_string(),
            email: email.to_string(),
        })
        .unwrap()
        .id
}

pub fn report_case(store: &dyn EntityStore, reporter: CitizenId, description: &str) -> CaseId {
    let case = store
        .create_case(NewCase {
            description: description.to_string(),
            reporter,
        })
        .unwrap();

    apply_with_retry(store, |s| {
        let current = s.get_case(case.id)?.expect("case just created");
        Ok(on_case_reported(&current, &s.assignment_view()?))
    })
    .unwrap();

    case.id
}

pub fn add_officer(store: &dyn EntityStore, email: &str) -> OfficerId {
    let officer = store
        .create_officer(NewOfficer {
            name: "Officer".to_string(),
            email: email.to_string(),
        })
        .unwrap();

    apply_with_retry(store, |s| {
        let current = s.get_officer(officer.id)?.expect("officer just created");
        Ok(on_officer_added(&current, &s.assignment_view()?))
    })
    .unwrap();

    officer.id
}

pub fn resolve_case(store: &dyn EntityStore, id: CaseId) -> ExResult<Transition> {
    apply_with_retry(store, |s| {
        let case = s.get_case(id)?;
        Ok(on_case_resolved(id, case.as_ref(), &s.assignment_view()?)?)
    })
}

pub fn remove_officer(store: &dyn EntityStore, id: OfficerId) -> ExResult<Transition> {
    apply_with_retry(store, |s| {
        let officer = s.get_officer(id)?;
        Ok(on_officer_removed(id, officer.as_ref())?)
    })
}

pub fn case(store: &dyn EntityStore, id: CaseId) -> Case {
    store.get_case(id).unwrap().expect("case exists")
}

pub fn officer(store: &dyn EntityStore, id: OfficerId) -> Officer {
    store.get_officer(id).unwrap().expect("officer exists")
}

pub fn assert_invariants(store: &MemoryStore) {
    let ledger = store.snapshot().unwrap();
    invariants::check_ledger(&ledger).unwrap();
}
