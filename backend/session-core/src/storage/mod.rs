//! Durable key-value persistence.
//!
//! Single-key `get`/`set`/`remove` plus batched variants. The session layer
//! only uses the batched ones, and every backend must apply a batch as one unit.

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

use crate::error::StoreError;

use async_trait::async_trait;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Read several keys from one consistent snapshot.
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError>;

    /// Write several keys, visible to readers all at once. A reader must never
    /// observe some of `entries` without the rest.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Remove several keys as one unit.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError>;
}
