/// Colors and container styles
use iced::gradient::Linear;
use iced::widget::container;
use iced::{color, theme, Background, Border, Color, Radians, Shadow, Theme, Vector};

pub const GRADIENT_START: Color = color!(0xFFD1DC);
pub const GRADIENT_END: Color = color!(0xADD8E6);
pub const PRIMARY: Color = color!(0x6D28D9);
pub const SECONDARY: Color = color!(0x8B5CF6);
pub const TEXT: Color = color!(0x374151);
pub const LIGHT_TEXT: Color = color!(0x4B5563);
pub const CARD_BACKGROUND: Color = color!(0xFDFCFE);
pub const LIKE: Color = color!(0x22C55E);
pub const PASS: Color = color!(0xEF4444);

pub fn app_theme() -> Theme {
    Theme::custom(
        "Paws".to_string(),
        theme::Palette {
            background: CARD_BACKGROUND,
            text: TEXT,
            primary: PRIMARY,
            success: LIKE,
            danger: PASS,
        },
    )
}

/// Diagonal pink-to-blue backdrop
pub fn backdrop(_theme: &Theme) -> container::Style {
    let gradient = Linear::new(Radians(std::f32::consts::FRAC_PI_4))
        .add_stop(0.0, GRADIENT_START)
        .add_stop(1.0, GRADIENT_END);

    container::Style {
        background: Some(Background::Gradient(gradient.into())),
        text_color: Some(TEXT),
        ..container::Style::default()
    }
}

/// Rounded translucent white panel used by the results and message views
pub fn panel(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color {
            a: 0.9,
            ..Color::WHITE
        })),
        text_color: Some(TEXT),
        border: Border {
            radius: 24.0.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color {
                a: 0.25,
                ..Color::BLACK
            },
            offset: Vector::new(0.0, 8.0),
            blur_radius: 24.0,
        },
    }
}

/// Error panel: pale red with a red border
pub fn error_panel(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(color!(0xFEE2E2))),
        text_color: Some(color!(0xDC2626)),
        border: Border {
            color: color!(0xFCA5A5),
            width: 1.0,
            radius: 8.0.into(),
        },
        ..container::Style::default()
    }
}

/// Thumbnail tile in the liked grid
pub fn tile(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(color!(0xF3F4F6))),
        border: Border {
            radius: 12.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    }
}
