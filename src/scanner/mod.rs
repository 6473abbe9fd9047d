//! Capture → classify → record pipeline.
//!
//! Only one scan runs at a time. The work runs on its own task, so a caller
//! that stops waiting (navigates away) does not cancel it: a verdict that
//! arrives late is still recorded.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serde::Serialize;

use crate::classifier::Classifier;
use crate::error::ScanError;
use crate::history::{HistorySnapshot, HistoryStore, ImageVault};
use crate::models::{CapturedImage, ClassificationResult};
use crate::{log_error, log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// What a finished scan produced: the verdict, and the history as it stands
/// with the verdict at its head.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub result: ClassificationResult,
    pub history: HistorySnapshot,
}

/// Clears the in-flight flag when the scan task ends, however it ends.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct ScanService {
    classifier: Arc<dyn Classifier>,
    vault: Arc<dyn ImageVault>,
    history: Arc<HistoryStore>,
    in_flight: Arc<AtomicBool>,
}

impl ScanService {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        vault: Arc<dyn ImageVault>,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            classifier,
            vault,
            history,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Classifies `bytes` and records the verdict.
    ///
    /// Returns [`ScanError::Busy`] without doing anything if another scan is
    /// pending. On a classifier or storage failure nothing is appended.
    pub async fn scan(&self, bytes: Vec<u8>) -> Result<ScanOutcome, ScanError> {
        let guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            log_warn!("Rejected scan: another scan is in flight");
            ScanError::Busy
        })?;

        let image = CapturedImage::sniff(bytes).ok_or_else(|| {
            log_warn!("Rejected scan: bytes are not a supported image");
            ScanError::UnsupportedImage
        })?;

        let service = self.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            service.run(image).await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                log_error!("Scan task failed: {join_err}");
                Err(ScanError::Interrupted(join_err.to_string()))
            }
        }
    }

    async fn run(&self, image: CapturedImage) -> Result<ScanOutcome, ScanError> {
        log_info!(
            "Scanning {} byte {} capture",
            image.bytes.len(),
            image.media_type
        );

        let result = self
            .classifier
            .classify(&image.bytes, image.media_type)
            .await
            .map_err(|err| {
                log_error!("Classification failed: {err}");
                ScanError::Classifier(err)
            })?;

        let image_ref = self.vault.put_image(&image).await.map_err(|err| {
            log_error!("Failed to store capture: {err}");
            ScanError::Storage(err)
        })?;

        let history = self
            .history
            .append_result(result.clone(), image_ref)
            .await?;

        log_info!(
            "Recorded '{}' ({}, score {})",
            result.item_name,
            result.category.as_str(),
            result.recyclability_score
        );

        Ok(ScanOutcome { result, history })
    }
}
