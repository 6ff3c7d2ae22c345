//! Pookie Storage Layer
//!
//! Durable key-value slots for browser state. The session snapshot lives in
//! a single named slot; a write replaces the whole value.

mod database;
mod error;
mod memory;
mod migrations;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StorageError>;

/// A durable key-value store holding whole-value slots.
///
/// Implementations must be safe to share between the session store and
/// whatever host owns the process.
pub trait SnapshotStore: Send + Sync {
    /// Read a slot. `Ok(None)` means the slot has never been written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot with `value`.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}
