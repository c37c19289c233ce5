use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tea::message::{DraftMessage, Message, RecipeMessage, SystemMessage};
use crate::tea::Model;
use crate::ui::{FocusedPane, UI};

/// Routes key presses to whichever layer currently owns input
///
/// Precedence: alert, then the creation popup, then the search box, then
/// the recipe list.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Handle a key event, returning the message it produces, if any
    pub fn handle_key_event(&self, key: KeyEvent, ui: &mut UI, model: &Model) -> Option<Message> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(SystemMessage::Quit.into());
        }

        // The alert blocks everything until dismissed.
        if ui.alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                ui.dismiss_alert();
            }
            return None;
        }

        if model.popup_active {
            return ui.recipe_form_mut().handle_key(key, &model.draft);
        }

        match ui.focused_pane() {
            FocusedPane::Search => {
                let message = ui.search_bar_mut().handle_key(key);
                if !ui.search_bar().is_active() {
                    ui.focus_recipe_list();
                }
                message
            }
            FocusedPane::RecipeList => self.handle_recipe_list_keys(key, ui, model),
        }
    }

    fn handle_recipe_list_keys(&self, key: KeyEvent, ui: &mut UI, model: &Model) -> Option<Message> {
        let visible = model.visible_recipes().len();

        match key.code {
            KeyCode::Char('q') => Some(SystemMessage::Quit.into()),
            KeyCode::Down | KeyCode::Char('j') => {
                ui.recipe_list_mut().select_next(visible);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                ui.recipe_list_mut().select_previous(visible);
                None
            }
            KeyCode::Enter | KeyCode::Char('v') => ui
                .recipe_list()
                .selected_id(model)
                .map(|id| RecipeMessage::ToggleView(id).into()),
            KeyCode::Delete | KeyCode::Char('d') => ui
                .recipe_list()
                .selected_id(model)
                .map(|id| RecipeMessage::Remove(id).into()),
            KeyCode::Char('a') => Some(DraftMessage::TogglePopup.into()),
            KeyCode::Char('/') => {
                ui.focus_search();
                None
            }
            KeyCode::Char('h') => Some(ui.search_bar().home()),
            _ => None,
        }
    }
}
