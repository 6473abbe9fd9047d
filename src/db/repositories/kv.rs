use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::Database;

pub(crate) fn upsert_value(
    conn: &Connection,
    key: &str,
    value: &str,
    now: DateTime<Utc>,
) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, now.to_rfc3339()],
    )
}

impl Database {
    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.execute(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    pub async fn put_value(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.execute(move |conn| {
            upsert_value(conn, &key, &value, Utc::now())?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_overwrites_existing_value() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("kv.sqlite3")).unwrap();

        assert_eq!(db.get_value("a").await.unwrap(), None);

        db.put_value("a", "1".into()).await.unwrap();
        db.put_value("a", "2".into()).await.unwrap();

        assert_eq!(db.get_value("a").await.unwrap().as_deref(), Some("2"));
        assert_eq!(db.get_value("b").await.unwrap(), None);
    }
}
