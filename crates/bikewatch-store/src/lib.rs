//! BikeWatch Store - SQLite persistence for officers, citizens and cases
//!
//! Provides:
//! - SQLite schema with an embedded, checksummed migrations framework
//! - `SqliteStore`, the durable `EntityStore` implementation
//! - Connection helpers

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteStore;
