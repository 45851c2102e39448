/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the state machine, the inference pipeline and the UI layer.

use image::RgbImage;
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use crate::inference::result::DisplayText;

/// A user-selected image, by path or by in-memory bytes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageAsset {
    /// File on disk (read lazily by the preprocessor)
    pub path: Option<PathBuf>,
    /// Already-loaded file contents; takes precedence over `path`
    pub bytes: Option<Vec<u8>>,
}

impl ImageAsset {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            bytes: None,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            path: None,
            bytes: Some(bytes),
        }
    }

    /// Raw encoded contents, from memory if present, otherwise from disk
    pub fn read_bytes(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match (&self.bytes, &self.path) {
            (Some(bytes), _) => Ok(Cow::Borrowed(bytes.as_slice())),
            (None, Some(path)) => std::fs::read(path).map(Cow::Owned),
            (None, None) => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "image asset has neither a path nor bytes",
            )),
        }
    }
}

impl fmt::Display for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, &self.bytes) {
            (Some(path), _) => write!(f, "{}", path.display()),
            (None, Some(bytes)) => write!(f, "<{} bytes>", bytes.len()),
            (None, None) => write!(f, "<empty asset>"),
        }
    }
}

/// Where the application is in its lifecycle
///
/// Only `AppStateMachine` writes this.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Waiting for the model to load
    Loading,
    /// Model loaded, nothing selected
    Ready,
    /// Preprocess → predict → format is running
    Predicting,
    /// Last prediction succeeded
    ResultDisplayed {
        text: DisplayText,
        /// Oriented RGB preview of the classified image
        image: RgbImage,
    },
    /// Last event failed
    Error {
        message: String,
        /// Whether a reset back to `Ready` is offered
        resettable: bool,
    },
}

impl AppState {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            AppState::Loading => "Loading",
            AppState::Ready => "Ready",
            AppState::Predicting => "Predicting",
            AppState::ResultDisplayed { .. } => "ResultDisplayed",
            AppState::Error { .. } => "Error",
        }
    }
}

/// Whether an event changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Accepted,
    /// Not valid in the current state; nothing changed
    Ignored,
}
