use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::Database;
use crate::error::StorageError;
use crate::history::ImageVault;
use crate::models::{CapturedImage, ImageRef};

/// Deletes every blob whose hash is not in `keep`. Returns how many went.
pub(crate) fn prune_unreferenced(
    conn: &Connection,
    keep: &HashSet<String>,
) -> rusqlite::Result<usize> {
    let stored: Vec<String> = {
        let mut stmt = conn.prepare("SELECT hash FROM image_blobs")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<_>>()?
    };

    let mut removed = 0;
    for hash in stored.iter().filter(|hash| !keep.contains(*hash)) {
        removed += conn.execute("DELETE FROM image_blobs WHERE hash = ?1", params![hash])?;
    }
    Ok(removed)
}

impl Database {
    pub async fn image_count(&self) -> Result<u64> {
        self.execute(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM image_blobs", [], |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
        .await
    }
}

#[async_trait]
impl ImageVault for Database {
    async fn put_image(&self, image: &CapturedImage) -> Result<ImageRef, StorageError> {
        let image_ref = image.image_ref();
        let hash = image_ref.hash.clone();
        let media_type = image.media_type.to_string();
        let bytes = image.bytes.clone();

        self.execute(move |conn| {
            // Same hash means same bytes; the first write wins.
            conn.execute(
                "INSERT OR IGNORE INTO image_blobs (hash, media_type, bytes, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![hash, media_type, bytes, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
        .await
        .map_err(StorageError::write)?;

        Ok(image_ref)
    }

    async fn get_image(&self, image_ref: &ImageRef) -> Result<Option<Vec<u8>>, StorageError> {
        let hash = image_ref.hash.clone();
        self.execute(move |conn| {
            let bytes = conn
                .query_row(
                    "SELECT bytes FROM image_blobs WHERE hash = ?1",
                    params![hash],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(bytes)
        })
        .await
        .map_err(StorageError::read)
    }
}
