use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::CitizenId;

/// Citizen - a person who reports stolen bikes
///
/// Credentials live with the user-management collaborator, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citizen {
    pub id: CitizenId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Citizen {
    pub fn new(id: CitizenId, name: String, email: String) -> Self {
        Self {
            id,
            name,
            email,
            created_at: Utc::now(),
        }
    }
}

/// Input for registering a citizen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCitizen {
    pub name: String,
    pub email: String,
}
