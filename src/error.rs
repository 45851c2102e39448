/// Error types for the classification pipeline.
///
/// Every error here is `Clone` so it can travel inside iced messages
/// from background tasks back to the state machine.

use std::path::PathBuf;
use thiserror::Error;

/// The model artifact could not be loaded. Fatal for the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelLoadError {
    /// Nothing (or not a regular file) at the resolved path
    #[error("model file not found: {}", path.display())]
    Missing { path: PathBuf },

    /// The backend refused the artifact (unreadable, corrupt, wrong format)
    #[error("invalid model artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Any failure between "image selected" and "result ready".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Error loading model:\n{0}")]
    ModelLoad(#[from] ModelLoadError),

    /// Not a decodable JPEG/PNG/BMP byte stream. `reason` goes to the log only.
    #[error("Image format not supported.")]
    UnsupportedFormat { reason: String },

    /// Tensor shape differs from the model's input shape
    #[error("Error: input shape {actual:?} does not match model input {expected:?}")]
    ShapeMismatch {
        expected: [usize; 4],
        actual: Vec<usize>,
    },

    /// The backend failed or produced an unusable output vector
    #[error("Error: {0}")]
    Inference(String),
}

impl PipelineError {
    pub fn unsupported(reason: impl Into<String>) -> Self {
        PipelineError::UnsupportedFormat {
            reason: reason.into(),
        }
    }

    /// Recoverable errors leave the model usable; the user may pick another file.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PipelineError::ModelLoad(_))
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
