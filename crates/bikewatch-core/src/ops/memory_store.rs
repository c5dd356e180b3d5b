use std::sync::{Mutex, MutexGuard};

use super::entity_store::EntityStore;
use super::ledger::Ledger;
use super::record_ops;
use crate::apply::apply_transition;
use crate::assignment_engine::{AssignmentView, PendingCase};
use crate::errors::{ExError, ExErrorKind, ExResult};
use crate::model::{
    Case, CaseId, Citizen, CitizenId, NewCase, NewCitizen, NewOfficer, Officer, OfficerId,
};
use crate::transition::Transition;

/// Thread-safe in-memory entity store
///
/// A single mutex guards the whole ledger, so every transition is computed
/// against and applied to one consistent state. Transitions are applied to
/// a clone which replaces the ledger only on success.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Mutex<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a pre-populated ledger
    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }

    /// Copy of the current ledger, for inspection in tests and tooling
    ///
    /// # Errors
    /// `Internal` if the ledger lock is poisoned.
    pub fn snapshot(&self) -> ExResult<Ledger> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> ExResult<MutexGuard<'_, Ledger>> {
        self.ledger.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("memory_store_lock")
                .with_message("ledger lock poisoned by a panicking writer")
        })
    }
}

impl EntityStore for MemoryStore {
    fn create_officer(&self, new: NewOfficer) -> ExResult<Officer> {
        let mut ledger = self.lock()?;
        let id = record_ops::create_officer(&mut ledger, new)
            .map_err(|e| ExError::from(e).with_op("create_officer"))?;
        Ok(ledger.get_officer(id)?.clone())
    }

    fn create_citizen(&self, new: NewCitizen) -> ExResult<Citizen> {
        let mut ledger = self.lock()?;
        let id = record_ops::create_citizen(&mut ledger, new)
            .map_err(|e| ExError::from(e).with_op("create_citizen"))?;
        Ok(ledger.get_citizen(id)?.clone())
    }

    fn create_case(&self, new: NewCase) -> ExResult<Case> {
        let mut ledger = self.lock()?;
        let id = record_ops::create_case(&mut ledger, new)
            .map_err(|e| ExError::from(e).with_op("create_case"))?;
        Ok(ledger.get_case(id)?.clone())
    }

    fn rename_officer(&self, id: OfficerId, name: String) -> ExResult<Officer> {
        let mut ledger = self.lock()?;
        record_ops::rename_officer(&mut ledger, id, name)
            .map_err(|e| ExError::from(e).with_op("rename_officer"))?;
        Ok(ledger.get_officer(id)?.clone())
    }

    fn get_officer(&self, id: OfficerId) -> ExResult<Option<Officer>> {
        Ok(self.lock()?.get_officer(id).ok().cloned())
    }

    fn get_case(&self, id: CaseId) -> ExResult<Option<Case>> {
        Ok(self.lock()?.get_case(id).ok().cloned())
    }

    fn get_citizen(&self, id: CitizenId) -> ExResult<Option<Citizen>> {
        Ok(self.lock()?.get_citizen(id).ok().cloned())
    }

    fn list_officers(&self) -> ExResult<Vec<Officer>> {
        Ok(self.lock()?.list_officers().into_iter().cloned().collect())
    }

    fn list_cases(&self) -> ExResult<Vec<Case>> {
        Ok(self.lock()?.list_cases().into_iter().cloned().collect())
    }

    fn list_citizens(&self) -> ExResult<Vec<Citizen>> {
        Ok(self.lock()?.list_citizens().into_iter().cloned().collect())
    }

    fn list_available_officers(&self) -> ExResult<Vec<OfficerId>> {
        Ok(self.lock()?.available_officers())
    }

    fn list_pending_unassigned_cases(&self) -> ExResult<Vec<PendingCase>> {
        Ok(self.lock()?.pending_unassigned_cases())
    }

    fn apply_transition(&self, transition: &Transition) -> ExResult<()> {
        let mut ledger = self.lock()?;
        let next = apply_transition(ledger.clone(), transition)
            .map_err(|e| ExError::from(e).with_op(transition.event.op()))?;
        *ledger = next;
        Ok(())
    }

    fn assignment_view(&self) -> ExResult<AssignmentView> {
        Ok(self.lock()?.view())
    }
}
