//! Integer identifiers for the three record kinds
//!
//! Ids are assigned by the entity store in insertion order. Their total
//! order is what the assignment engine's tie-breaks are defined over.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identity of an investigating officer
    OfficerId
);
entity_id!(
    /// Identity of a stolen-bike case
    CaseId
);
entity_id!(
    /// Identity of the citizen who reported a case
    CitizenId
);
