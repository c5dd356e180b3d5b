pub mod assignment;
pub mod case;
pub mod citizen;
pub mod ids;
pub mod officer;

pub use assignment::Assignment;
pub use case::{Case, CaseStatus, NewCase};
pub use citizen::{Citizen, NewCitizen};
pub use ids::{CaseId, CitizenId, OfficerId};
pub use officer::{NewOfficer, Officer};
