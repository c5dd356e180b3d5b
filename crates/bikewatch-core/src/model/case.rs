use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::ids::{CaseId, CitizenId, OfficerId};

/// Lifecycle state of a case
///
/// A resolved case carries no assignment at all, so "resolved but still
/// linked to an officer" cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "assignment", rename_all = "snake_case")]
pub enum CaseStatus {
    /// Bike not yet found; possibly under investigation
    Pending(Assignment<OfficerId>),
    /// Bike marked found
    Resolved,
}

/// Case - a reported stolen bike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,

    /// Free-text description supplied by the reporting citizen
    pub description: String,

    pub reporter: CitizenId,

    /// Creation time; defines FIFO order among pending cases (ties broken by id)
    pub reported_at: DateTime<Utc>,

    pub status: CaseStatus,
}

impl Case {
    /// Create a new pending, unassigned case
    pub fn new(id: CaseId, description: String, reporter: CitizenId) -> Self {
        Self {
            id,
            description,
            reporter,
            reported_at: Utc::now(),
            status: CaseStatus::Pending(Assignment::Unassigned),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.status, CaseStatus::Resolved)
    }

    /// Officer currently investigating this case, if any
    pub fn assigned_officer(&self) -> Option<OfficerId> {
        match self.status {
            CaseStatus::Pending(assignment) => assignment.assigned(),
            CaseStatus::Resolved => None,
        }
    }

    /// Unresolved and waiting for an officer
    pub fn is_pending_unassigned(&self) -> bool {
        matches!(self.status, CaseStatus::Pending(Assignment::Unassigned))
    }
}

/// Input for reporting a new case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCase {
    pub description: String,
    pub reporter: CitizenId,
}
