use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClassificationResult, ImageRef};

/// One persisted classification event. Created by the history store and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub image_ref: ImageRef,
    pub result: ClassificationResult,
    pub timestamp: DateTime<Utc>,
    pub points: u32,
}

/// Colour band of the score bar on a history card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        if score > 75 {
            ScoreBand::Good
        } else if score > 40 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }
}

impl HistoryEntry {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::for_score(self.result.recyclability_score)
    }
}
