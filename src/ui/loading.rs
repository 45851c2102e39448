/// Splash screen shown until the model is loaded (or failed to load)
use iced::widget::{column, container, image, text};
use iced::{Alignment, ContentFit, Element, Length};

use super::style;
use crate::Message;

pub const LOADING_TEXT: &str = "Loading AI model...\nPlease wait a moment";

const CREDIT_TEXT: &str = "Handwritten digit recognition, offline";

/// `headline` is the loading notice, or the load error once it happened
pub fn view<'a>(headline: &'a str, logo: Option<&'a image::Handle>) -> Element<'a, Message> {
    let mut content = column![text(headline)
        .size(20)
        .width(Length::Fill)
        .align_x(Alignment::Center)]
    .spacing(20)
    .padding(20)
    .align_x(Alignment::Center);

    if let Some(logo) = logo {
        content = content.push(
            image(logo.clone())
                .content_fit(ContentFit::Contain)
                .height(Length::FillPortion(3)),
        );
    }

    content = content.push(
        text(CREDIT_TEXT)
            .size(20)
            .width(Length::Fill)
            .align_x(Alignment::Center),
    );

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_y(Length::Fill)
        .style(style::loading_page)
        .into()
}
