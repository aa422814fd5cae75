use thiserror::Error;

/// Main error type for the guidance engine
#[derive(Error, Debug)]
pub enum GuideError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    Validation(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    // Event errors
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Malformed {kind} payload: {reason}")]
    MalformedPayload { kind: String, reason: String },

    // Catalog errors
    #[error("Card not found: {0}")]
    CardNotFound(String),

    // Collection cache errors
    #[error("No collection cache target has been set")]
    NoSaveTarget,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GuideError {
    pub fn malformed_payload(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        GuideError::MalformedPayload {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for GuideError
pub type Result<T> = std::result::Result<T, GuideError>;
