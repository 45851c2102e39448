use iced::widget::image::Handle;
use iced::{Element, Size, Task, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod error;
mod inference;
mod state;
mod ui;

use config::{AppConfig, ResourceRoot};
use error::{ModelLoadError, PipelineError};
use inference::{ModelRunner, OnnxBackend};
use state::{AppState, AppStateMachine, ImageAsset, PredictionJob, PredictionOutcome};

/// Main application state
struct DigitClassifier {
    /// Owns AppState and the loaded model
    machine: AppStateMachine,
    /// Preview handle for the current result, rebuilt only when the result changes
    preview: Option<Handle>,
    /// Loading screen logo, if the asset exists
    logo: Option<Handle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Startup delay elapsed, begin loading the model
    StartLoad,
    /// Background model load finished
    ModelLoaded(Result<Arc<ModelRunner<OnnxBackend>>, ModelLoadError>),
    /// User clicked "Upload Image"
    UploadImage,
    /// Background preprocess → predict → format finished
    PredictionFinished(Result<PredictionOutcome, PipelineError>),
    /// User clicked "Reset"
    Reset,
}

impl DigitClassifier {
    /// Create the app in Loading and schedule the model load
    fn new(root: ResourceRoot, config: AppConfig) -> (Self, Task<Message>) {
        let machine = AppStateMachine::from_config(&config, &root);

        let logo_path = root.join(&config.logo_path);
        let logo = logo_path.is_file().then(|| Handle::from_path(&logo_path));
        if logo.is_none() {
            log::debug!("No logo at {}", logo_path.display());
        }

        // Defer the load so the loading screen gets drawn first
        let delay = Duration::from_millis(config.load_delay_ms);
        let start = Task::perform(tokio::time::sleep(delay), |_| Message::StartLoad);

        (
            DigitClassifier {
                machine,
                preview: None,
                logo,
            },
            start,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::StartLoad => {
                if let Some(path) = self.machine.begin_load() {
                    return Task::perform(load_model_async(path), Message::ModelLoaded);
                }
                Task::none()
            }
            Message::ModelLoaded(loaded) => {
                self.machine.complete_load(loaded);
                Task::none()
            }
            Message::UploadImage => {
                if !self.machine.can_select_image() {
                    return Task::none();
                }

                // Native dialog; cancelling leaves everything as it was
                let Some(path) = ui::picker::pick_digit_image() else {
                    return Task::none();
                };

                match self.machine.begin_prediction(ImageAsset::from_path(path)) {
                    Some(job) => Task::perform(run_prediction_async(job), Message::PredictionFinished),
                    None => Task::none(),
                }
            }
            Message::PredictionFinished(outcome) => {
                self.machine.finish_prediction(outcome);
                self.refresh_preview();
                Task::none()
            }
            Message::Reset => {
                self.machine.reset();
                self.refresh_preview();
                Task::none()
            }
        }
    }

    /// Upload the current result image (if any) as a widget handle
    fn refresh_preview(&mut self) {
        self.preview = self.machine.display_image().map(|rgb| {
            let (width, height) = rgb.dimensions();
            let rgba = image::DynamicImage::ImageRgb8(rgb.clone()).into_rgba8();
            Handle::from_rgba(width, height, rgba.into_raw())
        });
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        match self.machine.state() {
            AppState::Loading => ui::loading::view(ui::loading::LOADING_TEXT, self.logo.as_ref()),
            // A failed load keeps the splash up with the error in place of the notice
            AppState::Error { message, .. } if !self.machine.is_model_loaded() => {
                ui::loading::view(message, self.logo.as_ref())
            }
            _ => ui::main_screen::view(&self.machine, self.preview.as_ref()),
        }
    }

    fn title(&self) -> String {
        "Handwritten Digit Classifier".to_string()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let root = ResourceRoot::resolve();
    let config = AppConfig::load_or_default(&root);
    let window_size = Size::new(config.window_width, config.window_height);

    iced::application(DigitClassifier::title, DigitClassifier::update, DigitClassifier::view)
        .theme(DigitClassifier::theme)
        .window_size(window_size)
        .centered()
        .run_with(move || DigitClassifier::new(root, config))
}

/// Load the ONNX model on a blocking worker
async fn load_model_async(path: PathBuf) -> Result<Arc<ModelRunner<OnnxBackend>>, ModelLoadError> {
    let worker_path = path.clone();
    tokio::task::spawn_blocking(move || AppStateMachine::<OnnxBackend>::load_model(&worker_path))
        .await
        .unwrap_or_else(|e| {
            Err(ModelLoadError::Invalid {
                path,
                reason: format!("Task join error: {}", e),
            })
        })
}

/// Run one prediction cycle on a blocking worker
async fn run_prediction_async(job: PredictionJob<OnnxBackend>) -> Result<PredictionOutcome, PipelineError> {
    tokio::task::spawn_blocking(move || job.run())
        .await
        .unwrap_or_else(|e| Err(PipelineError::Inference(format!("Task join error: {}", e))))
}
