use ratatui::style::Color;

/// Color palette shared by every recipe screen component
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub selection_text: Color,

    // Status colors
    pub error: Color,

    pub accent: Color,
}

impl ColorPalette {
    pub fn dark() -> Self {
        Self {
            text_primary: Color::Rgb(224, 224, 230),
            text_secondary: Color::Rgb(160, 160, 168),
            text_muted: Color::Rgb(112, 112, 120),

            border: Color::Rgb(64, 64, 72),
            border_focused: Color::Rgb(88, 166, 255),
            selection: Color::Rgb(88, 166, 255),
            selection_text: Color::Rgb(16, 16, 20),

            error: Color::Rgb(244, 67, 54),

            accent: Color::Rgb(88, 166, 255),
        }
    }

    pub fn light() -> Self {
        Self {
            text_primary: Color::Rgb(32, 32, 36),
            text_secondary: Color::Rgb(88, 88, 96),
            text_muted: Color::Rgb(136, 136, 144),

            border: Color::Rgb(200, 200, 208),
            border_focused: Color::Rgb(25, 118, 210),
            selection: Color::Rgb(25, 118, 210),
            selection_text: Color::Rgb(250, 250, 252),

            error: Color::Rgb(211, 47, 47),

            accent: Color::Rgb(25, 118, 210),
        }
    }
}
