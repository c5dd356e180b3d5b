//! BikeWatch Core - stolen-bike case assignment kernel
//!
//! This crate holds everything that decides and enforces who works on which
//! case:
//! - Officer, citizen and case models with the two-sided assignment link
//! - The pure assignment engine, which turns one event into a `Transition`
//! - `apply_transition`, the atomic functional boundary that enforces the
//!   assignment invariants
//! - The `EntityStore` trait and its in-memory implementation
//! - The structured error facility and logging facility shared by every crate

pub mod apply;
pub mod assignment_engine;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;
pub mod transition;

pub use bikewatch_core_types as core_types;

// Re-export commonly used types
pub use apply::apply_transition;
pub use assignment_engine::{AssignmentView, PendingCase};
pub use errors::{BikeWatchError, ExError, ExErrorKind, ExResult, Result};
pub use model::{Case, CaseId, CaseStatus, Citizen, CitizenId, Officer, OfficerId};
pub use ops::{EntityStore, Ledger, MemoryStore};
pub use transition::{AssignmentEvent, Link, Transition};
