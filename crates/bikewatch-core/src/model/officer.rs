use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::ids::{CaseId, OfficerId};

/// Officer - an investigator eligible for case assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub id: OfficerId,

    pub name: String,

    /// Unique among active officers
    pub email: String,

    /// Tombstone flag - false once the officer has been removed
    pub active: bool,

    /// The open case this officer investigates (mirror of `Case::status`)
    pub assignment: Assignment<CaseId>,

    pub created_at: DateTime<Utc>,
}

impl Officer {
    /// Create a new active, available officer
    pub fn new(id: OfficerId, name: String, email: String) -> Self {
        Self {
            id,
            name,
            email,
            active: true,
            assignment: Assignment::Unassigned,
            created_at: Utc::now(),
        }
    }

    /// Active and not investigating any case
    pub fn is_available(&self) -> bool {
        self.active && !self.assignment.is_assigned()
    }

    pub fn assigned_case(&self) -> Option<CaseId> {
        self.assignment.assigned()
    }
}

/// Input for adding an officer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOfficer {
    pub name: String,
    pub email: String,
}
