use thiserror::Error;

/// Unified error type for SnapGrade operations
#[derive(Error, Debug)]
pub enum SnapGradeError {
    #[error("Image payload of {len} chars exceeds the ceiling of {max}")]
    ImageTooLarge { len: usize, max: usize },

    #[error("Payload is not a base64 data URI")]
    InvalidImageData,

    #[error("Unsupported image format: {mime}")]
    UnsupportedFormat { mime: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnapGradeError {
    /// Stable user-facing message for this error. These strings are part of
    /// the HTTP contract of `POST /api/grade` and are mirrored verbatim by
    /// the upload client.
    pub fn user_message(&self) -> &'static str {
        match self {
            SnapGradeError::ImageTooLarge { .. } => {
                "Image too large, maximum file size is 4.5MB."
            }
            SnapGradeError::InvalidImageData => "Invalid image data",
            SnapGradeError::UnsupportedFormat { .. } => {
                "Unsupported format. Only JPEG, PNG, GIF, and WEBP files are supported."
            }
            SnapGradeError::Config(_) => "Service is misconfigured",
            SnapGradeError::Other(_) => "Internal error",
        }
    }
}

/// Convenience result type for SnapGrade operations
pub type Result<T> = std::result::Result<T, SnapGradeError>;
