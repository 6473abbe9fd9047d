pub mod analytics;
pub mod classifier;
pub mod db;
pub mod error;
pub mod history;
pub mod location;
pub mod models;
pub mod proximity;
pub mod refresh;
pub mod scanner;
pub mod settings;
pub mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::{info, warn};

use analytics::{BreakdownSlice, HistoryAnalytics, ProfileSummary};
use classifier::{Classifier, GeminiClassifier};
use db::Database;
use error::{PositionError, ScanError, StorageError};
use history::{HistorySnapshot, HistoryStore, ImageVault};
use location::LocationProvider;
use models::{HistoryEntry, ImageRef, RankedCenter};
use refresh::{NoopRefresh, RefreshAction, RefreshController, ScrollPosition};
use scanner::{ScanOutcome, ScanService};
use settings::SettingsStore;

const DATABASE_FILE: &str = "ecosort.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

/// Process-wide application state. Owns the one history store and hands it
/// to the scanner, the analytics views and the refresh controller.
pub struct EcoSort {
    db: Database,
    settings: SettingsStore,
    history: Arc<HistoryStore>,
    scanner: ScanService,
    refresh: RefreshController,
}

impl EcoSort {
    /// Opens the app state under `data_dir` with the Gemini classifier
    /// configured from settings and the environment. Pull-to-refresh only
    /// runs the hold; use [`EcoSort::open_with`] to attach work to it.
    pub async fn open(
        data_dir: impl AsRef<Path>,
        scroll: Arc<dyn ScrollPosition>,
    ) -> Result<Self> {
        Self::open_with(data_dir, scroll, Arc::new(NoopRefresh), |settings| {
            let gemini = GeminiClassifier::new(
                reqwest::Client::new(),
                settings.classifier(),
                settings.api_key(),
            );
            if !gemini.is_configured() {
                warn!("No classifier API key set; scans will fail until one is provided");
            }
            Arc::new(gemini) as Arc<dyn Classifier>
        })
        .await
    }

    pub async fn open_with<F>(
        data_dir: impl AsRef<Path>,
        scroll: Arc<dyn ScrollPosition>,
        refresh_action: Arc<dyn RefreshAction>,
        make_classifier: F,
    ) -> Result<Self>
    where
        F: FnOnce(&SettingsStore) -> Arc<dyn Classifier>,
    {
        utils::logging::init();
        info!("EcoSort starting up...");

        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let database = Database::new(data_dir.join(DATABASE_FILE))?;
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;

        let history = Arc::new(HistoryStore::open(Arc::new(database.clone())).await);
        let classifier = make_classifier(&settings);
        let scanner = ScanService::new(classifier, Arc::new(database.clone()), history.clone());
        let refresh = RefreshController::new(scroll, refresh_action);

        Ok(Self {
            db: database,
            settings,
            history,
            scanner,
            refresh,
        })
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn history(&self) -> HistorySnapshot {
        self.history.snapshot()
    }

    pub fn history_entry(&self, id: &str) -> Option<HistoryEntry> {
        self.history.get(id)
    }

    pub async fn captured_image(
        &self,
        image_ref: &ImageRef,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        self.db.get_image(image_ref).await
    }

    pub async fn scan(&self, bytes: Vec<u8>) -> Result<ScanOutcome, ScanError> {
        self.scanner.scan(bytes).await
    }

    pub fn is_scanning(&self) -> bool {
        self.scanner.is_scanning()
    }

    pub fn profile_summary(&self) -> ProfileSummary {
        let snapshot = self.history.snapshot();
        HistoryAnalytics::new(&snapshot).summary()
    }

    pub fn category_breakdown(&self) -> Vec<BreakdownSlice> {
        let snapshot = self.history.snapshot();
        HistoryAnalytics::new(&snapshot).breakdown()
    }

    pub async fn nearby_centers(
        &self,
        provider: &dyn LocationProvider,
    ) -> Result<Vec<RankedCenter>, PositionError> {
        let catalog = self.settings.center_catalog();
        location::nearby_centers(provider, &catalog).await
    }

    pub fn refresh(&self) -> &RefreshController {
        &self.refresh
    }
}
