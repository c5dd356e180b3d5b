//! Error handling for bikewatch-store
//!
//! Wraps bikewatch-core ExError with store-specific helpers

use bikewatch_core::errors::{ExError, ExErrorKind};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Map an error raised while applying a transition
///
/// A constraint failure means a link or status changed under us, and a busy
/// database means another process holds the write lock. Both are worth a
/// retry from fresh reads, so both become `Conflict`.
pub fn apply_error(err: rusqlite::Error) -> ExError {
    if is_sqlite_code(&err, ErrorCode::ConstraintViolation)
        || is_sqlite_code(&err, ErrorCode::DatabaseBusy)
        || is_sqlite_code(&err, ErrorCode::DatabaseLocked)
    {
        ExError::new(ExErrorKind::Conflict)
            .with_op("sqlite_apply_transition")
            .with_message(err.to_string())
    } else {
        from_rusqlite(err).with_op("sqlite_apply_transition")
    }
}

/// True for a UNIQUE/CHECK/foreign-key failure
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    is_sqlite_code(err, ErrorCode::ConstraintViolation)
}

fn is_sqlite_code(err: &rusqlite::Error, code: ErrorCode) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == code)
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
