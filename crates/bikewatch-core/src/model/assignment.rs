use serde::{Deserialize, Serialize};

/// One side of an officer/case link
///
/// Used on both records: an officer carries `Assignment<CaseId>`, a pending
/// case carries `Assignment<OfficerId>`. The two sides must mirror each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum Assignment<T> {
    Unassigned,
    Assigned(T),
}

impl<T: Copy> Assignment<T> {
    /// The linked id, if any
    pub fn assigned(&self) -> Option<T> {
        match self {
            Assignment::Assigned(id) => Some(*id),
            Assignment::Unassigned => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Assignment::Assigned(_))
    }
}

impl<T> Default for Assignment<T> {
    fn default() -> Self {
        Assignment::Unassigned
    }
}

impl<T> From<Option<T>> for Assignment<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(id) => Assignment::Assigned(id),
            None => Assignment::Unassigned,
        }
    }
}
