//! Migration framework
//!
//! Forward-only, embedded SQL migrations recorded in `schema_version` with a
//! SHA-256 checksum each. Re-running is a no-op; an applied migration whose
//! embedded SQL has since changed is refused.

mod checksums;
mod embedded;
mod runner;

pub use embedded::{get_migrations, Migration};
pub use runner::{applied_migrations, apply_migrations};
