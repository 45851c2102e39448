/// Handwritten digit inference pipeline
///
/// This module handles:
/// - Decoding and normalizing a selected image (preprocess.rs)
/// - Owning the loaded model and running predictions (runner.rs)
/// - Executing the exported classifier with ONNX Runtime (onnx.rs)
/// - Turning raw model output into a displayable result (result.rs)

pub mod preprocess;
pub mod runner;
pub mod onnx;
pub mod result;

pub use onnx::OnnxBackend;
pub use preprocess::ImagePreprocessor;
pub use runner::{InferenceBackend, ModelRunner};
