/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The event-driven state machine that drives the pipeline (machine.rs)

pub mod data;
pub mod machine;

pub use data::{AppState, ImageAsset};
pub use machine::{AppStateMachine, PredictionJob, PredictionOutcome};
