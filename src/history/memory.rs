use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{CapturedImage, HistoryEntry, ImageRef};

use super::{HistoryPersistence, ImageVault};

/// Process-local persistence for hosts without a data directory and for
/// tests. Failures can be switched on to exercise error paths.
#[derive(Default)]
pub struct MemoryPersistence {
    collections: Mutex<HashMap<String, Vec<HistoryEntry>>>,
    images: Mutex<HashMap<String, Vec<u8>>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    fail_image_writes: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self, key: &str) -> Option<Vec<HistoryEntry>> {
        lock(&self.collections).get(key).cloned()
    }

    pub fn image_count(&self) -> usize {
        lock(&self.images).len()
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Fails history saves only; image writes keep working.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_image_writes(&self, fail: bool) {
        self.fail_image_writes.store(fail, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[async_trait]
impl HistoryPersistence for MemoryPersistence {
    async fn load(&self, key: &str) -> Result<Vec<HistoryEntry>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            bail!("in-memory load failure");
        }
        Ok(lock(&self.collections).get(key).cloned().unwrap_or_default())
    }

    async fn save(&self, key: &str, entries: &[HistoryEntry]) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Write("in-memory save failure".into()));
        }
        lock(&self.collections).insert(key.to_string(), entries.to_vec());
        Ok(())
    }
}

#[async_trait]
impl ImageVault for MemoryPersistence {
    async fn put_image(&self, image: &CapturedImage) -> Result<ImageRef, StorageError> {
        if self.fail_image_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write("in-memory image write failure".into()));
        }
        let image_ref = image.image_ref();
        lock(&self.images)
            .entry(image_ref.hash.clone())
            .or_insert_with(|| image.bytes.clone());
        Ok(image_ref)
    }

    async fn get_image(&self, image_ref: &ImageRef) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(lock(&self.images).get(&image_ref.hash).cloned())
    }
}
