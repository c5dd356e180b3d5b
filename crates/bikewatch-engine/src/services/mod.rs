//! Case, officer and citizen services
//!
//! ## Logging Ownership
//!
//! Services own lifecycle logging for every public operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Conflict retries are logged at `warn` with `event = "retry"`. Lower layers
//! (store, core) only use `tracing::debug!()`.
//!
//! ## Event flow
//!
//! For each mutating event a service reads the records involved and an
//! `AssignmentView` from the store, asks the assignment engine for the
//! `Transition`, and applies it atomically. A `Conflict` from the store means
//! the view went stale; the whole read-decide-apply cycle is repeated.

#![allow(clippy::result_large_err)]

mod case_service;
mod citizen_service;
mod officer_service;
mod outcome;
mod retry;

pub use case_service::CaseService;
pub use citizen_service::CitizenService;
pub use officer_service::OfficerService;
pub use outcome::{AddOfficerOutcome, RemoveOfficerOutcome, ReportOutcome, ResolveOutcome};
pub use retry::RetryPolicy;

use std::sync::Arc;

use bikewatch_core::errors::{ExError, ExErrorKind, ExResult};
use bikewatch_core::EntityStore;
use bikewatch_core_types::RequestContext;
use bikewatch_store::SqliteStore;

use crate::config::Config;

/// Open the SQLite store named by the configuration
///
/// # Errors
/// `Persistence` or `Io` if the database cannot be opened or migrated.
pub fn open_store(config: &Config) -> ExResult<Arc<dyn EntityStore>> {
    let store = SqliteStore::open(&config.db_path)
        .map_err(|e| e.with_entity_id(config.db_path.display().to_string()))?;
    Ok(Arc::new(store))
}

/// Attach request correlation to an outgoing error
pub(crate) fn correlate(err: ExError, ctx: &RequestContext) -> ExError {
    let err = err.with_request_id(ctx.request_id.clone());
    match &ctx.trace_id {
        Some(trace_id) => err.with_trace_id(trace_id.clone()),
        None => err,
    }
}

/// A record the store just wrote must be readable
pub(crate) fn must_exist<T>(record: Option<T>, op: &str, entity: String) -> ExResult<T> {
    record.ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_op(op.to_string())
            .with_entity_id(entity)
            .with_message("record disappeared during the operation")
    })
}

pub(crate) fn elapsed_ms(start: std::time::Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
