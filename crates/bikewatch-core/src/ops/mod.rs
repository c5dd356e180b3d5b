pub mod entity_store;
pub mod ledger;
pub mod memory_store;
pub mod record_ops;

pub use entity_store::EntityStore;
pub use ledger::Ledger;
pub use memory_store::MemoryStore;
