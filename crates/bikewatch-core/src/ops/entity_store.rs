//! The entity store boundary consumed by the services
//!
//! Implemented by `MemoryStore` here and by `SqliteStore` in
//! `bikewatch-store`. Services receive an `Arc<dyn EntityStore>`.

use crate::assignment_engine::{AssignmentView, PendingCase};
use crate::errors::ExResult;
use crate::model::{
    Case, CaseId, Citizen, CitizenId, NewCase, NewCitizen, NewOfficer, Officer, OfficerId,
};
use crate::transition::Transition;

/// Durable storage for officers, citizens and cases
///
/// Lookups return `Ok(None)` for absent records; removed (tombstoned)
/// officers count as absent everywhere.
pub trait EntityStore: Send + Sync {
    /// Insert a new available officer
    ///
    /// # Errors
    /// `InvalidInput`, `AlreadyExists` (email in use), `Persistence`.
    fn create_officer(&self, new: NewOfficer) -> ExResult<Officer>;

    /// Insert a new citizen
    ///
    /// # Errors
    /// `InvalidInput`, `AlreadyExists` (email in use), `Persistence`.
    fn create_citizen(&self, new: NewCitizen) -> ExResult<Citizen>;

    /// Insert a new pending, unassigned case
    ///
    /// # Errors
    /// `InvalidInput`, `NotFound` (unknown reporter), `Persistence`.
    fn create_case(&self, new: NewCase) -> ExResult<Case>;

    /// Change an officer's display name; assignments are untouched
    ///
    /// # Errors
    /// `InvalidInput`, `NotFound`, `Persistence`.
    fn rename_officer(&self, id: OfficerId, name: String) -> ExResult<Officer>;

    /// # Errors
    /// `Persistence` if the store cannot be read.
    fn get_officer(&self, id: OfficerId) -> ExResult<Option<Officer>>;

    /// # Errors
    /// `Persistence` if the store cannot be read.
    fn get_case(&self, id: CaseId) -> ExResult<Option<Case>>;

    /// # Errors
    /// `Persistence` if the store cannot be read.
    fn get_citizen(&self, id: CitizenId) -> ExResult<Option<Citizen>>;

    /// Active officers by ascending id
    ///
    /// # Errors
    /// `Persistence` if the store cannot be read.
    fn list_officers(&self) -> ExResult<Vec<Officer>>;

    /// All cases by ascending id
    ///
    /// # Errors
    /// `Persistence` if the store cannot be read.
    fn list_cases(&self) -> ExResult<Vec<Case>>;

    /// # Errors
    /// `Persistence` if the store cannot be read.
    fn list_citizens(&self) -> ExResult<Vec<Citizen>>;

    /// Active officers with no case, by ascending id
    ///
    /// # Errors
    /// `Persistence` if the store cannot be read.
    fn list_available_officers(&self) -> ExResult<Vec<OfficerId>>;

    /// Unresolved cases with no officer, by ascending `(reported_at, id)`
    ///
    /// # Errors
    /// `Persistence` if the store cannot be read.
    fn list_pending_unassigned_cases(&self) -> ExResult<Vec<PendingCase>>;

    /// Apply every step of a transition atomically
    ///
    /// # Errors
    /// `Conflict` if any step's precondition no longer holds (nothing is
    /// written), `Persistence` if the write fails (rolled back).
    fn apply_transition(&self, transition: &Transition) -> ExResult<()>;

    /// Everything the assignment engine reads, in one call
    ///
    /// # Errors
    /// `Persistence` if the store cannot be read.
    fn assignment_view(&self) -> ExResult<AssignmentView> {
        Ok(AssignmentView::new(
            self.list_available_officers()?,
            self.list_pending_unassigned_cases()?,
        ))
    }
}
