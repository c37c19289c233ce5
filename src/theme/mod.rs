pub mod color;

use ratatui::style::{Modifier, Style};
use serde::{Deserialize, Serialize};

pub use color::ColorPalette;

/// Theme selection as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    Dark,
    Light,
}

/// Main theme structure
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub palette: ColorPalette,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            palette: ColorPalette::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            palette: ColorPalette::light(),
        }
    }

    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Border style, highlighted when the component has focus
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.palette.border_focused)
        } else {
            Style::default().fg(self.palette.border)
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text_secondary)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.palette.selection_text)
            .bg(self.palette.selection)
    }

    pub fn button_style(&self, focused: bool) -> Style {
        if focused {
            self.selected_style().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.accent)
        }
    }

    pub fn danger_style(&self) -> Style {
        Style::default().fg(self.palette.error)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
