use std::{
    collections::HashSet,
    ops::Deref,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::Utc;
use log::{info, warn};
use serde::{Serialize, Serializer};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{ClassificationResult, HistoryEntry, ImageRef, MAX_RECYCLABILITY_SCORE};

use super::HistoryPersistence;

pub const HISTORY_CAPACITY: usize = 50;
pub const HISTORY_KEY: &str = "ecosort.scanHistory";

/// Immutable view of the history, newest entry first.
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot(Arc<[HistoryEntry]>);

impl HistorySnapshot {
    fn from_vec(entries: Vec<HistoryEntry>) -> Self {
        Self(entries.into())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    pub fn find(&self, id: &str) -> Option<&HistoryEntry> {
        self.0.iter().find(|entry| entry.id == id)
    }
}

impl Deref for HistorySnapshot {
    type Target = [HistoryEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for HistorySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

/// Owner of the scan history. There is one per process; consumers receive it
/// by reference and read through [`HistoryStore::snapshot`].
pub struct HistoryStore {
    persistence: Arc<dyn HistoryPersistence>,
    key: String,
    current: RwLock<HistorySnapshot>,
    // Serializes appends across the persistence await.
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub async fn open(persistence: Arc<dyn HistoryPersistence>) -> Self {
        Self::open_with_key(persistence, HISTORY_KEY).await
    }

    pub async fn open_with_key(persistence: Arc<dyn HistoryPersistence>, key: &str) -> Self {
        let entries = match persistence.load(key).await {
            Ok(entries) => normalize_loaded(entries),
            Err(err) => {
                warn!("Persisted history under '{key}' is unreadable, starting empty: {err:#}");
                Vec::new()
            }
        };

        info!("History loaded with {} entries", entries.len());

        Self {
            persistence,
            key: key.to_string(),
            current: RwLock::new(HistorySnapshot::from_vec(entries)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        self.read_current().clone()
    }

    pub fn len(&self) -> usize {
        self.read_current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<HistoryEntry> {
        self.read_current().find(id).cloned()
    }

    /// Records a new classification at the head of the history.
    ///
    /// The new sequence is persisted before it becomes visible; if the save
    /// fails the previous snapshot stays current and the error is returned.
    pub async fn append(
        &self,
        result: ClassificationResult,
        image_ref: ImageRef,
        points: u32,
    ) -> Result<HistorySnapshot, StorageError> {
        let _guard = self.write_lock.lock().await;

        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            image_ref,
            result,
            timestamp: Utc::now(),
            points,
        };
        let entry_id = entry.id.clone();

        let prior = self.snapshot();
        let next = prepend_bounded(entry, &prior, HISTORY_CAPACITY);

        if let Err(err) = self.persistence.save(&self.key, &next).await {
            warn!("Dropping history entry {entry_id}: {err}");
            return Err(err);
        }

        let snapshot = HistorySnapshot::from_vec(next);
        *self.write_current() = snapshot.clone();
        Ok(snapshot)
    }

    /// [`HistoryStore::append`] with the standard points formula.
    pub async fn append_result(
        &self,
        result: ClassificationResult,
        image_ref: ImageRef,
    ) -> Result<HistorySnapshot, StorageError> {
        let points = result.points();
        self.append(result, image_ref, points).await
    }

    fn read_current(&self) -> RwLockReadGuard<'_, HistorySnapshot> {
        match self.current.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_current(&self) -> RwLockWriteGuard<'_, HistorySnapshot> {
        match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// New entry first, then every prior entry with a different id, cut to
/// `capacity`.
fn prepend_bounded(
    entry: HistoryEntry,
    prior: &[HistoryEntry],
    capacity: usize,
) -> Vec<HistoryEntry> {
    let mut next = Vec::with_capacity(capacity.min(prior.len() + 1));
    let new_id = entry.id.clone();
    next.push(entry);
    next.extend(
        prior
            .iter()
            .filter(|existing| existing.id != new_id)
            .cloned(),
    );
    next.truncate(capacity);
    next
}

/// A stored entry is usable only if its score is in range and its points
/// match the score.
fn is_consistent(entry: &HistoryEntry) -> bool {
    entry.result.recyclability_score <= MAX_RECYCLABILITY_SCORE
        && entry.points == entry.result.points()
}

/// Older builds or hand-edited files may hold more than the capacity,
/// repeated ids or out-of-range values. Inconsistent entries are dropped, then
/// the first occurrence of each id is kept in stored order.
fn normalize_loaded(entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    let loaded = entries.len();
    let mut seen = HashSet::with_capacity(loaded);
    let normalized: Vec<HistoryEntry> = entries
        .into_iter()
        .filter(|entry| {
            let keep = is_consistent(entry);
            if !keep {
                warn!(
                    "Dropping persisted entry {} (score {}, points {})",
                    entry.id, entry.result.recyclability_score, entry.points
                );
            }
            keep
        })
        .filter(|entry| seen.insert(entry.id.clone()))
        .take(HISTORY_CAPACITY)
        .collect();

    if normalized.len() != loaded {
        warn!(
            "Normalized persisted history from {loaded} to {} entries",
            normalized.len()
        );
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryPersistence;
    use crate::models::{Category, Recyclable};

    fn sample_result(name: &str, score: u8) -> ClassificationResult {
        ClassificationResult {
            item_name: name.to_string(),
            recyclable: Recyclable::Yes,
            category: Category::Recyclable,
            recyclability_score: score,
            instructions: "Flatten before recycling.".into(),
            alternatives: vec!["Reusable tote".into()],
            eco_friendly_tip: "Skip the bag when you can.".into(),
        }
    }

    fn image(n: usize) -> ImageRef {
        ImageRef::for_bytes(format!("image-{n}").as_bytes(), "image/png")
    }

    fn entry_with_id(id: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            image_ref: image(0),
            result: sample_result(id, 50),
            timestamp: Utc::now(),
            points: 5,
        }
    }

    #[tokio::test]
    async fn starts_empty_without_persisted_state() {
        let store = HistoryStore::open(Arc::new(MemoryPersistence::new())).await;
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn keeps_the_fifty_most_recent_in_reverse_append_order() {
        let store = HistoryStore::open(Arc::new(MemoryPersistence::new())).await;

        for n in 0..73 {
            store
                .append_result(sample_result(&format!("item-{n}"), 60), image(n))
                .await
                .unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), HISTORY_CAPACITY);
        for (position, entry) in snapshot.iter().enumerate() {
            assert_eq!(entry.result.item_name, format!("item-{}", 72 - position));
        }

        let ids: HashSet<_> = snapshot.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), HISTORY_CAPACITY);
    }

    #[tokio::test]
    async fn earlier_snapshots_are_not_affected_by_appends() {
        let store = HistoryStore::open(Arc::new(MemoryPersistence::new())).await;
        store.append_result(sample_result("can", 90), image(1)).await.unwrap();

        let before = store.snapshot();
        let returned = store
            .append_result(sample_result("bottle", 80), image(2))
            .await
            .unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].result.item_name, "can");
        assert_eq!(returned.len(), 2);
        assert_eq!(returned[0].result.item_name, "bottle");
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn append_assigns_points_and_persists() {
        let persistence = Arc::new(MemoryPersistence::new());
        let store = HistoryStore::open(persistence.clone()).await;

        let snapshot = store
            .append_result(sample_result("cardboard", 87), image(3))
            .await
            .unwrap();

        assert_eq!(snapshot[0].points, 9);
        let saved = persistence.stored(HISTORY_KEY).unwrap();
        assert_eq!(saved, snapshot.to_vec());
    }

    #[tokio::test]
    async fn failed_save_leaves_history_unchanged() {
        let persistence = Arc::new(MemoryPersistence::new());
        let store = HistoryStore::open(persistence.clone()).await;
        store.append_result(sample_result("tin", 70), image(1)).await.unwrap();

        persistence.fail_saves(true);
        let err = store
            .append_result(sample_result("foil", 30), image(2))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Write(_)));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].result.item_name, "tin");
        assert_eq!(persistence.stored(HISTORY_KEY).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreadable_persisted_state_opens_empty() {
        let persistence = Arc::new(MemoryPersistence::new());
        persistence.fail_loads(true);
        let store = HistoryStore::open(persistence).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn reopening_restores_saved_order() {
        let persistence = Arc::new(MemoryPersistence::new());
        {
            let store = HistoryStore::open(persistence.clone()).await;
            store.append_result(sample_result("first", 10), image(1)).await.unwrap();
            store.append_result(sample_result("second", 20), image(2)).await.unwrap();
        }

        let reopened = HistoryStore::open(persistence).await;
        let names: Vec<_> = reopened
            .snapshot()
            .iter()
            .map(|e| e.result.item_name.clone())
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn concurrent_appends_keep_bound_and_unique_ids() {
        let store = Arc::new(HistoryStore::open(Arc::new(MemoryPersistence::new())).await);

        let mut handles = Vec::new();
        for n in 0..80 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append_result(sample_result(&format!("item-{n}"), 40), image(n))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), HISTORY_CAPACITY);
        let ids: HashSet<_> = snapshot.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn prepend_drops_prior_entry_with_colliding_id() {
        let prior = vec![entry_with_id("a"), entry_with_id("b"), entry_with_id("c")];
        let next = prepend_bounded(entry_with_id("b"), &prior, HISTORY_CAPACITY);
        let ids: Vec<_> = next.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn normalize_dedupes_and_truncates() {
        let mut entries: Vec<_> = (0..60).map(|n| entry_with_id(&format!("id-{n}"))).collect();
        entries.insert(1, entry_with_id("id-0"));

        let normalized = normalize_loaded(entries);
        assert_eq!(normalized.len(), HISTORY_CAPACITY);
        assert_eq!(normalized[0].id, "id-0");
        assert_eq!(normalized[1].id, "id-1");
    }

    #[test]
    fn normalize_drops_out_of_range_scores_and_mismatched_points() {
        let mut over_range = entry_with_id("over-range");
        over_range.result.recyclability_score = 250;
        over_range.points = 25;

        let mut inflated = entry_with_id("inflated");
        inflated.points = 4_000_000;

        let entries = vec![entry_with_id("a"), over_range, inflated, entry_with_id("b")];
        let ids: Vec<_> = normalize_loaded(entries)
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn corrupt_entries_do_not_reach_analytics() {
        let persistence = Arc::new(MemoryPersistence::new());
        let mut corrupt = entry_with_id("corrupt");
        corrupt.result.recyclability_score = 250;
        corrupt.points = 4_000_000;
        persistence
            .save(HISTORY_KEY, &[corrupt, entry_with_id("ok")])
            .await
            .unwrap();

        let store = HistoryStore::open(persistence).await;
        let snapshot = store.snapshot();
        let analytics = crate::analytics::HistoryAnalytics::new(&snapshot);

        assert_eq!(analytics.total_scans(), 1);
        assert!(analytics.best_score() <= MAX_RECYCLABILITY_SCORE);
        assert_eq!(analytics.total_points(), 5);
    }
}
