#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use bikewatch_core::assignment_engine::{
    on_case_reported, on_case_resolved, on_officer_added, on_officer_removed,
};
use bikewatch_core::model::{NewCase, NewCitizen, NewOfficer};
use bikewatch_core::{
    CaseId, CitizenId, EntityStore, ExErrorKind, ExResult, OfficerId, Transition,
};
use bikewatch_store::SqliteStore;
use tempfile::TempDir;

/// Store on a fresh file inside a temp dir; keep the dir alive with the store
pub fn file_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("bikewatch.db")).unwrap();
    (dir, store)
}

fn with_retry(
    store: &dyn EntityStore,
    plan: impl Fn(&dyn EntityStore) -> ExResult<Transition>,
) -> ExResult<Transition> {
    let mut attempt = 1;
    loop {
        let transition = plan(store)?;
        match store.apply_transition(&transition) {
            Ok(()) => return Ok(transition),
            Err(e) if e.kind() == ExErrorKind::Conflict && attempt < 5 => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

pub fn citizen(store: &dyn EntityStore) -> CitizenId {
    store
        .create_citizen(NewCitizen {
            name: "Sam".to_string(),
            email: "sam@mail.test".to_string(),
        })
        .unwrap()
        .id
}

pub fn report(store: &dyn EntityStore, reporter: CitizenId, description: &str) -> CaseId {
    let id = store
        .create_case(NewCase {
            description: description.to_string(),
            reporter,
        })
        .unwrap()
        .id;
    with_retry(store, |s| {
        let case = s.get_case(id)?.expect("case exists");
        Ok(on_case_reported(&case, &s.assignment_view()?))
    })
    .unwrap();
    id
}

pub fn add_officer(store: &dyn EntityStore, email: &str) -> OfficerId {
    let id = store
        .create_officer(NewOfficer {
            name: "Officer".to_string(),
            email: email.to_string(),
        })
        .unwrap()
        .id;
    with_retry(store, |s| {
        let officer = s.get_officer(id)?.expect("officer exists");
        Ok(on_officer_added(&officer, &s.assignment_view()?))
    })
    .unwrap();
    id
}

pub fn resolve(store: &dyn EntityStore, id: CaseId) -> ExResult<Transition> {
    with_retry(store, |s| {
        let case = s.get_case(id)?;
        Ok(on_case_resolved(id, case.as_ref(), &s.assignment_view()?)?)
    })
}

pub fn remove(store: &dyn EntityStore, id: OfficerId) -> ExResult<Transition> {
    with_retry(store, |s| {
        let officer = s.get_officer(id)?;
        Ok(on_officer_removed(id, officer.as_ref())?)
    })
}
