/// View layer
///
/// Pure presentation over `AppStateMachine`: every widget reads machine
/// state, every interaction becomes a `Message`. No pipeline logic lives here.

pub mod loading;
pub mod main_screen;
pub mod picker;
pub mod style;
