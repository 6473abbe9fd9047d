pub mod center;
pub mod classification;
pub mod history;
pub mod image_ref;

pub use center::{Coordinates, RankedCenter, RecyclingCenter};
pub use classification::{Category, ClassificationResult, Recyclable, MAX_RECYCLABILITY_SCORE};
pub use history::{HistoryEntry, ScoreBand};
pub use image_ref::{CapturedImage, ImageRef};
