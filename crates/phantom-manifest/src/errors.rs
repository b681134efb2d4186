use thiserror::Error;

/// Errors that can occur while assembling or writing a descriptor
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to serialize descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),
}
