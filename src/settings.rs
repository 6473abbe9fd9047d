use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::models::RecyclingCenter;
use crate::proximity::default_catalog;

pub const API_KEY_ENV: &str = "ECOSORT_API_KEY";
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierSettings {
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct UserSettings {
    classifier: ClassifierSettings,
    /// Replaces the built-in center list when present.
    centers: Option<Vec<RecyclingCenter>>,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring malformed settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn classifier(&self) -> ClassifierSettings {
        self.read().classifier.clone()
    }

    pub fn update_classifier(&self, settings: ClassifierSettings) -> Result<()> {
        let mut guard = self.write();
        guard.classifier = settings;
        self.persist(&guard)
    }

    /// The center catalog for this process: the configured list, or the
    /// built-in one.
    pub fn center_catalog(&self) -> Vec<RecyclingCenter> {
        self.read()
            .centers
            .clone()
            .filter(|centers| !centers.is_empty())
            .unwrap_or_else(default_catalog)
    }

    pub fn update_centers(&self, centers: Option<Vec<RecyclingCenter>>) -> Result<()> {
        let mut guard = self.write();
        guard.centers = centers;
        self.persist(&guard)
    }

    /// API key from the environment; never written to the settings file.
    pub fn api_key(&self) -> Option<String> {
        [API_KEY_ENV, FALLBACK_API_KEY_ENV]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.classifier(), ClassifierSettings::default());
        assert_eq!(store.center_catalog(), default_catalog());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.classifier().model, "gemini-2.5-flash");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "classifier": { "model": "gemini-2.0-flash" } }"#).unwrap();
        let store = SettingsStore::new(path).unwrap();
        let classifier = store.classifier();
        assert_eq!(classifier.model, "gemini-2.0-flash");
        assert_eq!(classifier.temperature, 0.2);
    }

    #[test]
    fn updates_persist_across_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let centers = vec![RecyclingCenter {
            id: 42,
            name: "Harbour Depot".into(),
            address: "1 Quay Rd".into(),
            coordinates: Coordinates::new(51.5, -0.1),
        }];
        store.update_centers(Some(centers.clone())).unwrap();
        store
            .update_classifier(ClassifierSettings {
                temperature: 0.0,
                ..ClassifierSettings::default()
            })
            .unwrap();

        let reloaded = SettingsStore::new(path).unwrap();
        assert_eq!(reloaded.center_catalog(), centers);
        assert_eq!(reloaded.classifier().temperature, 0.0);

        let raw = fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(!raw.to_lowercase().contains("apikey"));
    }
}
