use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::recipe::{Draft, ListKind};
use crate::tea::message::{DraftMessage, Message};
use crate::theme::Theme;

/// Focusable controls of the creation popup
///
/// List rows are addressed by position only. Removing a row above the
/// focused one shifts a different value under the same focus slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Title,
    Desc,
    Item(ListKind, usize),
    Add(ListKind),
    Submit,
    Close,
}

/// Creation popup with dynamic ingredient and step rows
#[derive(Debug)]
pub struct RecipeForm {
    focus: FormFocus,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self {
            focus: FormFocus::Title,
        }
    }
}

impl RecipeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    /// Tab order for the current draft
    fn focus_order(draft: &Draft) -> Vec<FormFocus> {
        let mut order = vec![FormFocus::Title, FormFocus::Desc];
        for kind in [ListKind::Ingredient, ListKind::Step] {
            order.extend((0..draft.list(kind).len()).map(|i| FormFocus::Item(kind, i)));
            order.push(FormFocus::Add(kind));
        }
        order.push(FormFocus::Submit);
        order.push(FormFocus::Close);
        order
    }

    pub fn focus_next(&mut self, draft: &Draft) {
        let order = Self::focus_order(draft);
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(current + 1) % order.len()];
    }

    pub fn focus_previous(&mut self, draft: &Draft) {
        let order = Self::focus_order(draft);
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(current + order.len() - 1) % order.len()];
    }

    /// Pull focus back into range after the draft shrank
    pub fn clamp_focus(&mut self, draft: &Draft) {
        if let FormFocus::Item(kind, index) = self.focus {
            let len = draft.list(kind).len();
            if index >= len {
                self.focus = if len == 0 {
                    FormFocus::Add(kind)
                } else {
                    FormFocus::Item(kind, len - 1)
                };
            }
        }
    }

    pub fn reset_focus(&mut self) {
        self.focus = FormFocus::Title;
    }

    /// Translate a key into a draft message. Text edits always send the
    /// complete new value of the focused field.
    pub fn handle_key(&mut self, key: KeyEvent, draft: &Draft) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => Some(DraftMessage::ClosePopup.into()),
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next(draft);
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_previous(draft);
                None
            }
            KeyCode::Char('s') if ctrl => Some(DraftMessage::Submit.into()),
            KeyCode::Char('d') if ctrl => match self.focus {
                FormFocus::Item(kind, index) => {
                    Some(DraftMessage::RemoveListElement { kind, index }.into())
                }
                _ => None,
            },
            KeyCode::Enter => self.activate(draft),
            KeyCode::Backspace => self.edit_focused(draft, |value| {
                value.pop();
            }),
            KeyCode::Char(c) if !ctrl => self.edit_focused(draft, |value| value.push(c)),
            _ => None,
        }
    }

    fn activate(&mut self, draft: &Draft) -> Option<Message> {
        match self.focus {
            FormFocus::Add(kind) => {
                // Focus the row about to be appended.
                self.focus = FormFocus::Item(kind, draft.list(kind).len());
                Some(DraftMessage::AppendListElement(kind).into())
            }
            FormFocus::Submit => Some(DraftMessage::Submit.into()),
            FormFocus::Close => Some(DraftMessage::ClosePopup.into()),
            FormFocus::Title | FormFocus::Desc | FormFocus::Item(..) => {
                self.focus_next(draft);
                None
            }
        }
    }

    fn edit_focused<F>(&self, draft: &Draft, edit: F) -> Option<Message>
    where
        F: FnOnce(&mut String),
    {
        match self.focus {
            FormFocus::Title => {
                let mut value = draft.title.clone();
                edit(&mut value);
                Some(DraftMessage::SetTitle(value).into())
            }
            FormFocus::Desc => {
                let mut value = draft.desc.clone();
                edit(&mut value);
                Some(DraftMessage::SetDesc(value).into())
            }
            FormFocus::Item(kind, index) => {
                let mut value = draft.list(kind).get(index)?.clone();
                edit(&mut value);
                Some(DraftMessage::EditListField { kind, value, index }.into())
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, draft: &Draft, theme: &Theme) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Add a New Recipe")
            .border_style(theme.border_style(true));

        let mut lines = vec![
            Line::from(Span::styled("Title", theme.title_style())),
            self.input_line(FormFocus::Title, &draft.title, theme),
            Line::from(Span::styled("Description", theme.title_style())),
            self.input_line(FormFocus::Desc, &draft.desc, theme),
        ];

        for (kind, heading) in [(ListKind::Ingredient, "Ingredients"), (ListKind::Step, "Steps")] {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(heading, theme.title_style())));
            for (i, value) in draft.list(kind).iter().enumerate() {
                let mut line = self.input_line(FormFocus::Item(kind, i), value, theme);
                line.spans.push(Span::styled("  ✕", theme.danger_style()));
                lines.push(line);
            }
            lines.push(self.button_line(
                FormFocus::Add(kind),
                &format!("Add {}", kind.label()),
                theme,
            ));
        }

        lines.push(Line::from(""));
        let mut buttons = self.button_line(FormFocus::Submit, "Submit", theme);
        buttons.spans.push(Span::raw("  "));
        buttons
            .spans
            .extend(self.button_line(FormFocus::Close, "Close", theme).spans);
        lines.push(buttons);
        lines.push(Line::from(Span::styled(
            "Tab: next  Enter: activate  Ctrl-D: remove row  Ctrl-S: submit  Esc: close",
            theme.muted_style(),
        )));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn input_line(&self, focus: FormFocus, value: &str, theme: &Theme) -> Line<'static> {
        let focused = self.focus == focus;
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            theme.selected_style()
        } else {
            theme.text_style()
        };
        Line::from(vec![
            Span::styled(marker, theme.button_style(false)),
            Span::styled(format!("[{}]", value), style),
        ])
    }

    fn button_line(&self, focus: FormFocus, label: &str, theme: &Theme) -> Line<'static> {
        Line::from(Span::styled(
            format!("[ {} ]", label),
            theme.button_style(self.focus == focus),
        ))
    }
}
