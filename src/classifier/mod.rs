//! Image classifier seam and its Gemini-backed implementation.

pub mod gemini;
pub mod response;

use async_trait::async_trait;

use crate::error::ClassifierError;
use crate::models::ClassificationResult;

pub use gemini::GeminiClassifier;
pub use response::parse_classification;

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        image: &[u8],
        media_type: &str,
    ) -> Result<ClassificationResult, ClassifierError>;
}
