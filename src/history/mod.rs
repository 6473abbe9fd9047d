//! Bounded scan history and the persistence seams it is written through.

pub mod memory;
pub mod store;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{CapturedImage, HistoryEntry, ImageRef};

pub use memory::MemoryPersistence;
pub use store::{HistorySnapshot, HistoryStore, HISTORY_CAPACITY, HISTORY_KEY};

/// Durable home of the history collection.
///
/// `load` reports `Ok(vec![])` when nothing was ever saved under `key`. Any
/// error is recovered by the store as an empty history, so implementations
/// should not try to repair data themselves.
#[async_trait]
pub trait HistoryPersistence: Send + Sync {
    async fn load(&self, key: &str) -> Result<Vec<HistoryEntry>>;

    /// Replaces the collection stored under `key`. Either the whole sequence
    /// is written or nothing is.
    async fn save(&self, key: &str, entries: &[HistoryEntry]) -> Result<(), StorageError>;
}

/// Content-addressed storage for captured images.
#[async_trait]
pub trait ImageVault: Send + Sync {
    async fn put_image(&self, image: &CapturedImage) -> Result<ImageRef, StorageError>;

    async fn get_image(&self, image_ref: &ImageRef) -> Result<Option<Vec<u8>>, StorageError>;
}
