/// Model ownership and the single `predict` entry point.

use ndarray::ArrayView4;
use std::path::{Path, PathBuf};

use crate::error::{ModelLoadError, PipelineError, Result};
use crate::inference::preprocess::{InputTensor, INPUT_SHAPE};
use crate::inference::result::PredictionResult;

/// Something that can execute the classifier.
///
/// Implementations are read-only after `load`; any interior locking the
/// runtime needs stays inside the backend.
pub trait InferenceBackend: Send + Sync + Sized + 'static {
    /// Load the artifact at `path`. The error string is shown to the user.
    fn load(path: &Path) -> std::result::Result<Self, String>;

    /// Run one forward pass and return the flattened output vector
    fn infer(&self, input: ArrayView4<'_, f32>) -> std::result::Result<Vec<f32>, String>;
}

/// Owns the loaded model (the "model handle") for the rest of the process
#[derive(Debug)]
pub struct ModelRunner<B> {
    backend: B,
    path: PathBuf,
}

impl<B: InferenceBackend> ModelRunner<B> {
    /// Load the model artifact at `path`
    pub fn load(path: impl Into<PathBuf>) -> std::result::Result<Self, ModelLoadError> {
        let path = path.into();
        if !path.is_file() {
            return Err(ModelLoadError::Missing { path });
        }

        let backend = B::load(&path).map_err(|reason| ModelLoadError::Invalid {
            path: path.clone(),
            reason,
        })?;

        log::info!("🧠 Model loaded from {}", path.display());
        Ok(Self { backend, path })
    }

    /// Classify one input tensor. Exactly one backend call, no retries.
    pub fn predict(&self, tensor: &InputTensor) -> Result<PredictionResult> {
        if tensor.shape() != INPUT_SHAPE {
            return Err(PipelineError::ShapeMismatch {
                expected: INPUT_SHAPE,
                actual: tensor.shape().to_vec(),
            });
        }

        let raw = self.backend.infer(tensor.view()).map_err(PipelineError::Inference)?;
        PredictionResult::from_raw(&raw)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
