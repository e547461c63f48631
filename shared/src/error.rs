use thiserror::Error;

/// Everything that can end an upload early. The `Display` text is exactly
/// what the result area shows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    #[error("Invalid file type. Please upload PNG, JPG, or JPEG images only.")]
    InvalidType { mime_type: String },

    #[error("File too large. Please upload images smaller than 5MB.")]
    TooLarge { size: u64 },

    #[error("Error reading file. Please try again.")]
    ReadError(String),

    #[error("Classification failed: Server error: {0}")]
    ServerError(u16),

    #[error("Classification failed: {0}")]
    NetworkError(String),

    #[error("Unexpected response format from server")]
    MalformedResult,
}

impl From<serde_json::Error> for ClassifyError {
    fn from(err: serde_json::Error) -> Self {
        ClassifyError::NetworkError(err.to_string())
    }
}
