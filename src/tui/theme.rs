use ratatui::style::Color;

use crate::preferences::Theme;

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub on_accent: Color,
    pub user: Color,
    pub assistant: Color,
    pub success: Color,
    pub error: Color,
    pub info: Color,
}

const LIGHT: Palette = Palette {
    background: Color::Rgb(250, 250, 250),
    text: Color::Rgb(24, 24, 27),
    muted: Color::Rgb(113, 113, 122),
    border: Color::Rgb(212, 212, 216),
    accent: Color::Rgb(16, 185, 129), // Emerald
    on_accent: Color::Rgb(250, 250, 250),
    user: Color::Rgb(37, 99, 235),
    assistant: Color::Rgb(5, 150, 105),
    success: Color::Rgb(16, 185, 129),
    error: Color::Rgb(239, 68, 68),
    info: Color::Rgb(59, 130, 246),
};

const DARK: Palette = Palette {
    background: Color::Rgb(24, 24, 27),
    text: Color::Rgb(244, 244, 245),
    muted: Color::Rgb(161, 161, 170),
    border: Color::Rgb(63, 63, 70),
    accent: Color::Rgb(16, 185, 129),
    on_accent: Color::Rgb(250, 250, 250),
    user: Color::Rgb(96, 165, 250),
    assistant: Color::Rgb(52, 211, 153),
    success: Color::Rgb(16, 185, 129),
    error: Color::Rgb(248, 113, 113),
    info: Color::Rgb(96, 165, 250),
};

pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    }
}
