/// Classifier screen: title, preview, result banner, actions
use iced::widget::{button, column, container, image, row, text};
use iced::{Alignment, Color, ContentFit, Element, Length};

use super::style;
use crate::state::{AppState, AppStateMachine};
use crate::Message;

pub const PLACEHOLDER_TEXT: &str = "Upload a handwritten digit image";

const CLASSIFYING_TEXT: &str = "Classifying...";

pub fn view<'a>(machine: &'a AppStateMachine, preview: Option<&'a image::Handle>) -> Element<'a, Message> {
    let title = container(
        text("Handwritten Digit Classifier")
            .size(24)
            .width(Length::Fill)
            .align_x(Alignment::Center),
    )
    .padding(10)
    .width(Length::Fill)
    .height(Length::FillPortion(1))
    .center_y(Length::FillPortion(1))
    .style(style::banner);

    let panel: Element<'a, Message> = match preview {
        Some(handle) => image(handle.clone()).content_fit(ContentFit::Contain).into(),
        None => text("").into(),
    };
    let panel = container(panel)
        .width(Length::Fill)
        .height(Length::FillPortion(6))
        .center_x(Length::Fill)
        .center_y(Length::FillPortion(6));

    let result = container(
        text(result_text(machine))
            .size(18)
            .width(Length::Fill)
            .align_x(Alignment::Center),
    )
    .padding(10)
    .width(Length::Fill)
    .height(Length::FillPortion(2))
    .center_y(Length::FillPortion(2))
    .style(style::banner);

    let upload = button(text("Upload Image").width(Length::Fill).align_x(Alignment::Center))
        .width(Length::Fill)
        .padding(10)
        .style(style::action_button(Color::from_rgb(0.1, 0.5, 0.8)))
        .on_press_maybe(machine.can_select_image().then_some(Message::UploadImage));

    let reset = button(text("Reset").width(Length::Fill).align_x(Alignment::Center))
        .width(Length::Fill)
        .padding(10)
        .style(style::action_button(Color::from_rgb(0.2, 0.6, 0.9)))
        .on_press_maybe(machine.can_reset().then_some(Message::Reset));

    let actions = container(row![upload, reset].spacing(10))
        .padding(10)
        .width(Length::Fill)
        .height(Length::FillPortion(2))
        .center_y(Length::FillPortion(2))
        .style(style::banner);

    container(column![title, panel, result, actions])
        .width(Length::Fill)
        .height(Length::Fill)
        .style(style::main_page)
        .into()
}

/// Text for the result banner in each state
fn result_text(machine: &AppStateMachine) -> String {
    match machine.state() {
        AppState::ResultDisplayed { text, .. } => text.to_string(),
        AppState::Error { message, .. } => message.clone(),
        AppState::Predicting => CLASSIFYING_TEXT.to_string(),
        AppState::Loading | AppState::Ready => PLACEHOLDER_TEXT.to_string(),
    }
}
