use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use crate::db::Database;
use crate::error::StorageError;
use crate::history::HistoryPersistence;
use crate::models::HistoryEntry;

use super::{images::prune_unreferenced, kv::upsert_value};

#[async_trait]
impl HistoryPersistence for Database {
    async fn load(&self, key: &str) -> Result<Vec<HistoryEntry>> {
        let Some(raw) = self.get_value(key).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("stored history under '{key}' is not valid JSON"))
    }

    /// Writes the collection and drops image blobs no entry references, in
    /// one transaction.
    async fn save(&self, key: &str, entries: &[HistoryEntry]) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(entries).map_err(StorageError::write)?;
        let referenced: HashSet<String> = entries
            .iter()
            .map(|entry| entry.image_ref.hash.clone())
            .collect();
        let key = key.to_string();

        self.execute(move |conn| {
            let tx = conn.transaction()?;
            upsert_value(&tx, &key, &serialized, Utc::now())?;
            let pruned = prune_unreferenced(&tx, &referenced)?;
            tx.commit()?;

            if pruned > 0 {
                debug!("Pruned {pruned} unreferenced image blobs");
            }
            Ok(())
        })
        .await
        .map_err(StorageError::write)
    }
}
