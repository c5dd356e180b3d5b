//! BikeWatch Engine - service orchestration layer
//!
//! Case, officer and citizen services that sequence store reads, the pure
//! assignment engine and atomic transition application, plus configuration
//! loading and store construction.

pub mod config;
pub mod services;

pub use config::Config;
pub use services::{
    open_store, AddOfficerOutcome, CaseService, CitizenService, OfficerService,
    RemoveOfficerOutcome, ReportOutcome, ResolveOutcome, RetryPolicy,
};
