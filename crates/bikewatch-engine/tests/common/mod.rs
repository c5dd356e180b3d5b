#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use bikewatch_core::assignment_engine::{AssignmentView, PendingCase};
use bikewatch_core::errors::{ExError, ExErrorKind, ExResult};
use bikewatch_core::model::{
    Case, CaseId, Citizen, CitizenId, NewCase, NewCitizen, NewOfficer, Officer, OfficerId,
};
use bikewatch_core::{AssignmentEvent, EntityStore, Link, MemoryStore, Transition};
use bikewatch_core_types::RequestContext;
use bikewatch_engine::{CaseService, CitizenService, OfficerService, RetryPolicy};

pub struct Services {
    pub cases: CaseService,
    pub officers: OfficerService,
    pub citizens: CitizenService,
}

impl Services {
    pub fn over(store: Arc<dyn EntityStore>) -> Self {
        Self::with_policy(store, RetryPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn EntityStore>, retry: RetryPolicy) -> Self {
        Self {
            cases: CaseService::new(Arc::clone(&store), retry),
            officers: OfficerService::new(Arc::clone(&store), retry),
            citizens: CitizenService::new(store),
        }
    }

    pub fn citizen(&self, email: &str) -> CitizenId {
        self.citizens
            .register_citizen(
                &ctx(),
                NewCitizen {
                    name: "Sam".to_string(),
                    email: email.to_string(),
                },
            )
            .unwrap()
            .id
    }

    pub fn officer(&self, email: &str) -> OfficerId {
        self.officers
            .add_officer(&ctx(), new_officer(email))
            .unwrap()
            .officer
            .id
    }

    pub fn report(&self, reporter: CitizenId, description: &str) -> CaseId {
        self.cases
            .report_case(&ctx(), new_case(reporter, description))
            .unwrap()
            .case
            .id
    }
}

pub fn ctx() -> RequestContext {
    RequestContext::new()
}

pub fn new_officer(email: &str) -> NewOfficer {
    NewOfficer {
        name: "Officer".to_string(),
        email: email.to_string(),
    }
}

pub fn new_case(reporter: CitizenId, description: &str) -> NewCase {
    NewCase {
        description: description.to_string(),
        reporter,
    }
}

/// MemoryStore whose next `failures` transition applies report `Conflict`
///
/// It can also link a record the moment it is created, the way a concurrent
/// event that won the race would.
pub struct FlakyStore {
    inner: MemoryStore,
    failures: AtomicU32,
    link_next_case_to: Mutex<Option<OfficerId>>,
    link_next_officer_to: Mutex<Option<CaseId>>,
}

impl FlakyStore {
    pub fn new(failures: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            failures: AtomicU32::new(failures),
            link_next_case_to: Mutex::new(None),
            link_next_officer_to: Mutex::new(None),
        }
    }

    /// The next created case is linked to `officer` before the caller sees it
    pub fn link_next_case_to(&self, officer: OfficerId) {
        *self.link_next_case_to.lock().unwrap() = Some(officer);
    }

    /// The next created officer is linked to `case` before the caller sees it
    pub fn link_next_officer_to(&self, case: CaseId) {
        *self.link_next_officer_to.lock().unwrap() = Some(case);
    }

    fn link_behind_caller(&self, event: AssignmentEvent, link: Link) {
        let t = Transition::new(event).with_link(link);
        self.inner.apply_transition(&t).unwrap();
    }

    pub fn fail_next(&self, failures: u32) {
        self.failures.store(failures, Ordering::SeqCst);
    }
}

impl EntityStore for FlakyStore {
    fn create_officer(&self, new: NewOfficer) -> ExResult<Officer> {
        let officer = self.inner.create_officer(new)?;
        if let Some(case) = self.link_next_officer_to.lock().unwrap().take() {
            self.link_behind_caller(
                AssignmentEvent::CaseReported(case),
                Link::new(officer.id, case),
            );
        }
        Ok(officer)
    }
    fn create_citizen(&self, new: NewCitizen) -> ExResult<Citizen> {
        self.inner.create_citizen(new)
    }
    fn create_case(&self, new: NewCase) -> ExResult<Case> {
        let case = self.inner.create_case(new)?;
        if let Some(officer) = self.link_next_case_to.lock().unwrap().take() {
            self.link_behind_caller(
                AssignmentEvent::OfficerAdded(officer),
                Link::new(officer, case.id),
            );
        }
        Ok(case)
    }
    fn rename_officer(&self, id: OfficerId, name: String) -> ExResult<Officer> {
        self.inner.rename_officer(id, name)
    }
    fn get_officer(&self, id: OfficerId) -> ExResult<Option<Officer>> {
        self.inner.get_officer(id)
    }
    fn get_case(&self, id: CaseId) -> ExResult<Option<Case>> {
        self.inner.get_case(id)
    }
    fn get_citizen(&self, id: CitizenId) -> ExResult<Option<Citizen>> {
        self.inner.get_citizen(id)
    }
    fn list_officers(&self) -> ExResult<Vec<Officer>> {
        self.inner.list_officers()
    }
    fn list_cases(&self) -> ExResult<Vec<Case>> {
        self.inner.list_cases()
    }
    fn list_citizens(&self) -> ExResult<Vec<Citizen>> {
        self.inner.list_citizens()
    }
    fn list_available_officers(&self) -> ExResult<Vec<OfficerId>> {
        self.inner.list_available_officers()
    }
    fn list_pending_unassigned_cases(&self) -> ExResult<Vec<PendingCase>> {
        self.inner.list_pending_unassigned_cases()
    }
    fn assignment_view(&self) -> ExResult<AssignmentView> {
        self.inner.assignment_view()
    }
    fn apply_transition(&self, transition: &Transition) -> ExResult<()> {
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(ExError::new(ExErrorKind::Conflict).with_message("injected conflict"));
        }
        self.inner.apply_transition(transition)
    }
}
