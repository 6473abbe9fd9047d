use thiserror::Error;

/// Persistence write or read failed. The in-memory history is left as it was
/// before the failing call.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to save history: {0}")]
    Write(String),

    #[error("failed to read from storage: {0}")]
    Read(String),
}

impl StorageError {
    pub fn write(err: impl std::fmt::Display) -> Self {
        StorageError::Write(format!("{err:#}"))
    }

    pub fn read(err: impl std::fmt::Display) -> Self {
        StorageError::Read(format!("{err:#}"))
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier API key is not configured")]
    NotConfigured,

    #[error("classifier request failed: {0}")]
    Transport(String),

    #[error("classifier returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("classifier returned malformed data: {0}")]
    Malformed(String),
}

impl ClassifierError {
    /// Message shown to the user in the scanner's error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClassifierError::NotConfigured => {
                "The classifier is not configured. Please add an API key."
            }
            _ => "Failed to get analysis. Please check your connection or API key.",
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("Location access denied")]
    Denied,

    #[error("Location unavailable")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("a scan is already in progress")]
    Busy,

    #[error("unsupported image format")]
    UnsupportedImage,

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("scan task stopped before finishing: {0}")]
    Interrupted(String),
}

impl ScanError {
    pub fn user_message(&self) -> String {
        match self {
            ScanError::Busy => "Please wait for the current scan to finish.".to_string(),
            ScanError::UnsupportedImage => {
                "That file is not a supported image. Try a JPEG or PNG photo.".to_string()
            }
            ScanError::Classifier(err) => err.user_message().to_string(),
            ScanError::Storage(_) => {
                "The result could not be saved to your history. Please try again.".to_string()
            }
            ScanError::Interrupted(_) => "The scan stopped unexpectedly. Please try again.".to_string(),
        }
    }
}
