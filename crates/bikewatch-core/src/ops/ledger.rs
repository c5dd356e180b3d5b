use std::collections::BTreeMap;

use crate::assignment_engine::{AssignmentView, PendingCase};
use crate::errors::{BikeWatchError, Result};
use crate::model::{Case, CaseId, Citizen, CitizenId, Officer, OfficerId};

/// In-memory state of officers, cases and citizens
///
/// BTreeMaps keep iteration in id order, which is the order every listing
/// and tie-break is defined over. Not synchronised on its own; `MemoryStore`
/// wraps it in a mutex.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Officers by id, tombstoned ones included
    pub(crate) officers: BTreeMap<OfficerId, Officer>,
    pub(crate) cases: BTreeMap<CaseId, Case>,
    pub(crate) citizens: BTreeMap<CitizenId, Citizen>,
    last_officer_id: i64,
    last_case_id: i64,
    last_citizen_id: i64,
}

impl Ledger {
    /// Create a new empty Ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an active Officer by ID
    ///
    /// # Errors
    ///
    /// Returns `OfficerNotFound` if the officer doesn't exist or was removed.
    pub fn get_officer(&self, id: OfficerId) -> Result<&Officer> {
        self.officers
            .get(&id)
            .filter(|o| o.active)
            .ok_or(BikeWatchError::OfficerNotFound { officer_id: id })
    }

    /// Get an Officer by ID, bypassing the tombstone check
    pub fn get_officer_raw(&self, id: OfficerId) -> Option<&Officer> {
        self.officers.get(&id)
    }

    pub(crate) fn get_officer_mut(&mut self, id: OfficerId) -> Result<&mut Officer> {
        self.officers
            .get_mut(&id)
            .filter(|o| o.active)
            .ok_or(BikeWatchError::OfficerNotFound { officer_id: id })
    }

    /// Get a Case by ID
    ///
    /// # Errors
    ///
    /// Returns `CaseNotFound` if the case doesn't exist.
    pub fn get_case(&self, id: CaseId) -> Result<&Case> {
        self.cases
            .get(&id)
            .ok_or(BikeWatchError::CaseNotFound { case_id: id })
    }

    pub(crate) fn get_case_mut(&mut self, id: CaseId) -> Result<&mut Case> {
        self.cases
            .get_mut(&id)
            .ok_or(BikeWatchError::CaseNotFound { case_id: id })
    }

    /// Get a Citizen by ID
    ///
    /// # Errors
    ///
    /// Returns `CitizenNotFound` if the citizen doesn't exist.
    pub fn get_citizen(&self, id: CitizenId) -> Result<&Citizen> {
        self.citizens
            .get(&id)
            .ok_or(BikeWatchError::CitizenNotFound { citizen_id: id })
    }

    /// List active officers in id order
    pub fn list_officers(&self) -> Vec<&Officer> {
        self.officers.values().filter(|o| o.active).collect()
    }

    /// List all cases in id order
    pub fn list_cases(&self) -> Vec<&Case> {
        self.cases.values().collect()
    }

    pub fn list_citizens(&self) -> Vec<&Citizen> {
        self.citizens.values().collect()
    }

    /// Ids of active officers with no case, ascending
    pub fn available_officers(&self) -> Vec<OfficerId> {
        self.officers
            .values()
            .filter(|o| o.is_available())
            .map(|o| o.id)
            .collect()
    }

    /// Pending unassigned cases, oldest first (ties by id)
    pub fn pending_unassigned_cases(&self) -> Vec<PendingCase> {
        let mut pending: Vec<PendingCase> = self
            .cases
            .values()
            .filter(|c| c.is_pending_unassigned())
            .map(|c| PendingCase::new(c.id, c.reported_at))
            .collect();
        pending.sort_by_key(|p| (p.reported_at, p.id));
        pending
    }

    /// Snapshot of everything the assignment engine reads
    pub fn view(&self) -> AssignmentView {
        AssignmentView::new(self.available_officers(), self.pending_unassigned_cases())
    }

    /// Insert an Officer as-is
    ///
    /// Used by record operations and test helpers. Later generated ids
    /// continue after the highest inserted id.
    pub fn insert_officer(&mut self, officer: Officer) {
        self.last_officer_id = self.last_officer_id.max(officer.id.get());
        self.officers.insert(officer.id, officer);
    }

    /// Insert a Case as-is
    pub fn insert_case(&mut self, case: Case) {
        self.last_case_id = self.last_case_id.max(case.id.get());
        self.cases.insert(case.id, case);
    }

    /// Insert a Citizen as-is
    pub fn insert_citizen(&mut self, citizen: Citizen) {
        self.last_citizen_id = self.last_citizen_id.max(citizen.id.get());
        self.citizens.insert(citizen.id, citizen);
    }

    pub(crate) fn next_officer_id(&mut self) -> OfficerId {
        self.last_officer_id += 1;
        OfficerId(self.last_officer_id)
    }

    pub(crate) fn next_case_id(&mut self) -> CaseId {
        self.last_case_id += 1;
        CaseId(self.last_case_id)
    }

    pub(crate) fn next_citizen_id(&mut self) -> CitizenId {
        self.last_citizen_id += 1;
        CitizenId(self.last_citizen_id)
    }
}
