use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tea::message::{Message, SearchMessage};
use crate::theme::Theme;

/// Brand shown left of the search box; activating it resets the search
pub const BRAND: &str = "My Recipe";

const PLACEHOLDER: &str = "Enter Dishes";

/// Header search box
///
/// Owns only the text being typed. The query applied to the list lives in
/// the model and changes only on submit or home.
#[derive(Debug, Default)]
pub struct SearchBar {
    input: String,
    active: bool,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Handle a key while the box has focus. `Enter` submits the text as typed.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Enter => {
                self.active = false;
                Some(SearchMessage::Search(self.input.clone()).into())
            }
            KeyCode::Esc => {
                self.active = false;
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    /// Home affordance. The typed text stays in the box even though the
    /// applied query is cleared.
    pub fn home(&self) -> Message {
        SearchMessage::Reset.into()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(theme.border_style(self.active));

        let content = if self.input.is_empty() && !self.active {
            Line::from(Span::styled(PLACEHOLDER, theme.muted_style()))
        } else {
            Line::from(Span::styled(
                self.input.clone(),
                Style::default().fg(theme.palette.text_primary),
            ))
        };

        frame.render_widget(Paragraph::new(content).block(block), area);

        if self.active {
            frame.set_cursor(cursor_column(area, &self.input), area.y.saturating_add(1));
        }
    }
}

/// Column just past the typed text, kept inside the box border
fn cursor_column(area: Rect, input: &str) -> u16 {
    let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(typed)
        .min(area.right().saturating_sub(2))
}
