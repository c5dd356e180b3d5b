//! Read-only input to the assignment engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{CaseId, OfficerId};

/// A pending, unassigned case together with its FIFO sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCase {
    pub id: CaseId,
    pub reported_at: DateTime<Utc>,
}

impl PendingCase {
    pub fn new(id: CaseId, reported_at: DateTime<Utc>) -> Self {
        Self { id, reported_at }
    }

    fn fifo_key(&self) -> (DateTime<Utc>, CaseId) {
        (self.reported_at, self.id)
    }
}

/// Officer availability and pending-case set, as read from the entity store.
///
/// Stores hand these over already sorted, but selection below does not rely
/// on it: picks are taken by minimum so that the outcome is a function of the
/// set alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentView {
    pub available_officers: Vec<OfficerId>,
    pub pending_cases: Vec<PendingCase>,
}

impl AssignmentView {
    pub fn new(available_officers: Vec<OfficerId>, pending_cases: Vec<PendingCase>) -> Self {
        Self {
            available_officers,
            pending_cases,
        }
    }

    /// Lowest id among available officers
    pub fn pick_officer(&self) -> Option<OfficerId> {
        self.available_officers.iter().copied().min()
    }

    /// Oldest pending unassigned case by `(reported_at, id)`, skipping `excluding`
    pub fn oldest_pending(&self, excluding: Option<CaseId>) -> Option<CaseId> {
        self.pending_cases
            .iter()
            .filter(|c| Some(c.id) != excluding)
            .min_by_key(|c| c.fifo_key())
            .map(|c| c.id)
    }
}
