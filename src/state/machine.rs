/// The application state machine
///
/// Drives Loading → Ready → Predicting → ResultDisplayed / Error in
/// response to three events: start, image selected, reset. Events are
/// handled one at a time; an event that is not valid in the current state
/// is ignored and leaves the state untouched.
///
/// Long-running work can be split off: `begin_load`/`complete_load` and
/// `begin_prediction`/`finish_prediction` let the UI run the blocking part
/// on a worker and publish the outcome in a single assignment.

use image::RgbImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::data::{AppState, EventOutcome, ImageAsset};
use crate::config::{AppConfig, ResourceRoot};
use crate::error::{ModelLoadError, PipelineError};
use crate::inference::result::{self, DisplayText, PredictionResult};
use crate::inference::{ImagePreprocessor, InferenceBackend, ModelRunner, OnnxBackend};

/// Everything a successful predict cycle produces
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub result: PredictionResult,
    pub text: DisplayText,
    pub image: RgbImage,
}

/// One preprocess → predict → format cycle, detached from the state machine
#[derive(Debug)]
pub struct PredictionJob<B> {
    runner: Arc<ModelRunner<B>>,
    preprocessor: ImagePreprocessor,
    asset: ImageAsset,
}

impl<B: InferenceBackend> PredictionJob<B> {
    /// Run the pipeline. Blocks for decoding and inference.
    pub fn run(self) -> Result<PredictionOutcome, PipelineError> {
        let prepared = self.preprocessor.prepare(&self.asset)?;
        let result = self.runner.predict(&prepared.tensor)?;
        let text = result::format(&result);

        log::info!(
            "🔢 {} → digit {} ({:.2}%)",
            self.asset,
            result.predicted_class(),
            result.confidence() * 100.0
        );

        Ok(PredictionOutcome {
            result,
            text,
            image: prepared.display,
        })
    }
}

/// Owns `AppState` and the loaded model
pub struct AppStateMachine<B = OnnxBackend> {
    state: AppState,
    runner: Option<Arc<ModelRunner<B>>>,
    model_path: PathBuf,
    preprocessor: ImagePreprocessor,
    load_started: bool,
    /// At least one prediction succeeded this session
    has_succeeded: bool,
}

impl<B: InferenceBackend> AppStateMachine<B> {
    /// Create a machine in `Loading` for the model at `model_path`
    pub fn new(model_path: impl Into<PathBuf>, display_size: u32) -> Self {
        Self {
            state: AppState::Loading,
            runner: None,
            model_path: model_path.into(),
            preprocessor: ImagePreprocessor::new(display_size),
            load_started: false,
            has_succeeded: false,
        }
    }

    pub fn from_config(config: &AppConfig, root: &ResourceRoot) -> Self {
        Self::new(root.join(&config.model_path), config.display_size)
    }

    /// Load the model artifact. Blocking; safe to call off the UI thread.
    pub fn load_model(path: &Path) -> Result<Arc<ModelRunner<B>>, ModelLoadError> {
        ModelRunner::load(path).map(Arc::new)
    }

    // ========== Events ==========

    /// "start": load the model inline and leave `Loading`
    pub fn start(&mut self) -> EventOutcome {
        match self.begin_load() {
            Some(path) => {
                let loaded = Self::load_model(&path);
                self.complete_load(loaded)
            }
            None => EventOutcome::Ignored,
        }
    }

    /// First half of "start": returns the model path to load, once
    pub fn begin_load(&mut self) -> Option<PathBuf> {
        if self.state != AppState::Loading || self.load_started {
            log::warn!("⚠️  Ignoring start event in {} state", self.state.name());
            return None;
        }
        self.load_started = true;
        log::info!("⏳ Loading model from {}", self.model_path.display());
        Some(self.model_path.clone())
    }

    /// Second half of "start": publish the load outcome
    pub fn complete_load(&mut self, loaded: Result<Arc<ModelRunner<B>>, ModelLoadError>) -> EventOutcome {
        if self.state != AppState::Loading {
            log::warn!("⚠️  Ignoring model load result in {} state", self.state.name());
            return EventOutcome::Ignored;
        }

        match loaded {
            Ok(runner) => {
                log::info!("✅ Ready, model {}", runner.path().display());
                self.runner = Some(runner);
                self.transition(AppState::Ready);
            }
            Err(e) => {
                log::error!("❌ Model load failed: {}", e);
                // No model, no predictions: nothing to reset back to
                self.transition(AppState::Error {
                    message: PipelineError::from(e).to_string(),
                    resettable: false,
                });
            }
        }
        EventOutcome::Accepted
    }

    /// "image selected": run the whole pipeline inline
    pub fn image_selected(&mut self, asset: ImageAsset) -> EventOutcome {
        match self.begin_prediction(asset) {
            Some(job) => {
                let outcome = job.run();
                self.finish_prediction(outcome)
            }
            None => EventOutcome::Ignored,
        }
    }

    /// First half of "image selected": enter `Predicting` and hand out the job.
    ///
    /// Returns `None` while loading, without a model, or while another
    /// prediction is still running.
    pub fn begin_prediction(&mut self, asset: ImageAsset) -> Option<PredictionJob<B>> {
        let runner = match (&self.state, &self.runner) {
            (AppState::Ready | AppState::ResultDisplayed { .. } | AppState::Error { .. }, Some(runner)) => {
                Arc::clone(runner)
            }
            _ => {
                log::warn!("⚠️  Ignoring image selection in {} state", self.state.name());
                return None;
            }
        };

        log::info!("🖼️  Classifying {}", asset);
        self.transition(AppState::Predicting);

        Some(PredictionJob {
            runner,
            preprocessor: self.preprocessor,
            asset,
        })
    }

    /// Second half of "image selected": publish the pipeline outcome
    pub fn finish_prediction(&mut self, outcome: Result<PredictionOutcome, PipelineError>) -> EventOutcome {
        if self.state != AppState::Predicting {
            log::warn!("⚠️  Ignoring prediction result in {} state", self.state.name());
            return EventOutcome::Ignored;
        }

        let next = match outcome {
            Ok(outcome) => {
                log::debug!("Distribution: {:?}", outcome.result.distribution());
                self.has_succeeded = true;
                AppState::ResultDisplayed {
                    text: outcome.text,
                    image: outcome.image,
                }
            }
            Err(e) => {
                let resettable = match &e {
                    PipelineError::UnsupportedFormat { reason } => {
                        log::warn!("⚠️  Unsupported image: {}", reason);
                        self.has_succeeded
                    }
                    other => {
                        log::error!("❌ Prediction failed: {}", other);
                        other.is_recoverable()
                    }
                };
                AppState::Error {
                    message: e.to_string(),
                    resettable,
                }
            }
        };

        self.transition(next);
        EventOutcome::Accepted
    }

    /// "reset": clear the result (or resettable error) and return to `Ready`
    pub fn reset(&mut self) -> EventOutcome {
        if !self.can_reset() {
            log::warn!("⚠️  Ignoring reset in {} state", self.state.name());
            return EventOutcome::Ignored;
        }
        self.transition(AppState::Ready);
        EventOutcome::Accepted
    }

    // ========== Queries for the view layer ==========

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn display_text(&self) -> Option<&DisplayText> {
        match &self.state {
            AppState::ResultDisplayed { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn display_image(&self) -> Option<&RgbImage> {
        match &self.state {
            AppState::ResultDisplayed { image, .. } => Some(image),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            AppState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the reset action should be enabled
    pub fn can_reset(&self) -> bool {
        match &self.state {
            AppState::ResultDisplayed { .. } => true,
            AppState::Error { resettable, .. } => *resettable,
            _ => false,
        }
    }

    /// Whether a new image can be picked right now
    pub fn can_select_image(&self) -> bool {
        self.runner.is_some() && !matches!(self.state, AppState::Loading | AppState::Predicting)
    }

    pub fn is_model_loaded(&self) -> bool {
        self.runner.is_some()
    }

    fn transition(&mut self, next: AppState) {
        log::info!("🔁 {} → {}", self.state.name(), next.name());
        self.state = next;
    }
}
