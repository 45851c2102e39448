/// Colours and widget styles shared by both screens
use iced::widget::{button, container};
use iced::{Background, Border, Color, Theme};

/// Banner blue behind the title, result and button row
pub const BANNER: Color = Color::from_rgb(0.02, 0.53, 0.82);

const LOADING_BACKGROUND: Color = Color::from_rgb(0.9, 0.9, 0.95);
const MAIN_BACKGROUND: Color = Color::from_rgb(0.75, 0.87, 1.0);

pub fn banner(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(BANNER.into()),
        text_color: Some(Color::WHITE),
        ..Default::default()
    }
}

pub fn loading_page(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(LOADING_BACKGROUND.into()),
        text_color: Some(Color::BLACK),
        ..Default::default()
    }
}

pub fn main_page(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(MAIN_BACKGROUND.into()),
        ..Default::default()
    }
}

/// Flat coloured button that greys out when disabled
pub fn action_button(base: Color) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let background = match status {
            button::Status::Active => base,
            button::Status::Hovered => Color { a: 0.85, ..base },
            button::Status::Pressed => Color { a: 0.7, ..base },
            button::Status::Disabled => Color { a: 0.35, ..base },
        };

        button::Style {
            background: Some(Background::Color(background)),
            text_color: Color::WHITE,
            border: Border {
                radius: 4.0.into(),
                ..Border::default()
            },
            ..Default::default()
        }
    }
}
