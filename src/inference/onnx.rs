/// ONNX Runtime backend for the digit classifier.

use ndarray::ArrayView4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

use crate::inference::runner::InferenceBackend;

/// An ONNX Runtime session over the exported classifier
///
/// `Session::run` needs exclusive access, so the session sits behind a mutex.
pub struct OnnxBackend {
    session: Mutex<Session>,
    output_name: String,
}

impl InferenceBackend for OnnxBackend {
    fn load(path: &Path) -> Result<Self, String> {
        let session = Session::builder()
            .map_err(|e| format!("Failed to create session builder: {}", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| format!("Failed to set optimization level: {}", e))?
            .commit_from_file(path)
            .map_err(|e| format!("Failed to load model: {}", e))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| "Model has no outputs".to_string())?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }

    fn infer(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, String> {
        let input = Tensor::from_array(input.to_owned())
            .map_err(|e| format!("Failed to create input tensor: {}", e))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| "Failed to acquire session lock".to_string())?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| format!("Inference failed: {}", e))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| format!("Output '{}' not found", self.output_name))?;

        let probabilities = output
            .try_extract_array::<f32>()
            .map_err(|e| format!("Failed to extract tensor: {}", e))?;

        Ok(probabilities.iter().copied().collect())
    }
}

impl std::fmt::Debug for OnnxBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxBackend")
            .field("output_name", &self.output_name)
            .finish()
    }
}
