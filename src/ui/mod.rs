pub mod alert;
pub mod footer;
pub mod markup;
pub mod recipe_form;
pub mod recipe_list;
pub mod search_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tea::{Model, UICommand};
use crate::theme::Theme;

use self::{
    markup::MarkupPolicy, recipe_form::RecipeForm, recipe_list::RecipeList,
    search_bar::{SearchBar, BRAND},
};

pub use recipe_form::FormFocus;

/// Which part of the main screen receives keys when no overlay is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    RecipeList,
    Search,
}

/// Terminal front end for the recipe model
///
/// Holds only presentation state: focus, cursor positions, the search box
/// text and the blocking alert. Everything else is read from the model.
pub struct UI {
    focused_pane: FocusedPane,
    search_bar: SearchBar,
    recipe_list: RecipeList,
    recipe_form: RecipeForm,
    alert: Option<String>,
    theme: Theme,
    markup_policy: MarkupPolicy,
}

impl UI {
    pub fn new(theme: Theme, markup_policy: MarkupPolicy) -> Self {
        Self {
            focused_pane: FocusedPane::RecipeList,
            search_bar: SearchBar::new(),
            recipe_list: RecipeList::new(),
            recipe_form: RecipeForm::new(),
            alert: None,
            theme,
            markup_policy,
        }
    }

    pub fn focused_pane(&self) -> FocusedPane {
        self.focused_pane
    }

    pub fn focus_search(&mut self) {
        self.focused_pane = FocusedPane::Search;
        self.search_bar.activate();
    }

    pub fn focus_recipe_list(&mut self) {
        self.focused_pane = FocusedPane::RecipeList;
        self.search_bar.deactivate();
    }

    pub fn search_bar(&self) -> &SearchBar {
        &self.search_bar
    }

    pub fn search_bar_mut(&mut self) -> &mut SearchBar {
        &mut self.search_bar
    }

    pub fn recipe_list(&self) -> &RecipeList {
        &self.recipe_list
    }

    pub fn recipe_list_mut(&mut self) -> &mut RecipeList {
        &mut self.recipe_list
    }

    pub fn recipe_form_mut(&mut self) -> &mut RecipeForm {
        &mut self.recipe_form
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn apply(&mut self, command: UICommand) {
        match command {
            UICommand::Alert(message) => {
                tracing::debug!("Alert: {}", message);
                self.alert = Some(message);
            }
        }
    }

    /// Re-align cursors with a freshly updated model
    pub fn sync_with(&mut self, model: &Model) {
        self.recipe_list.clamp(model.visible_recipes().len());
        if model.popup_active {
            self.recipe_form.clamp_focus(&model.draft);
        } else {
            self.recipe_form.reset_focus();
        }
    }

    pub fn render(&mut self, frame: &mut Frame, model: &Model) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(size);

        self.render_header(frame, chunks[0]);
        self.render_toolbar(frame, chunks[1], model);

        let list_focused =
            self.focused_pane == FocusedPane::RecipeList && !model.popup_active;
        self.recipe_list.render(
            frame,
            chunks[2],
            model,
            &self.theme,
            self.markup_policy,
            list_focused,
        );
        footer::render(frame, chunks[3], &self.theme);

        if model.popup_active {
            let area = centered_rect(70, 80, size);
            self.recipe_form.render(frame, area, &model.draft, &self.theme);
        }

        if let Some(message) = &self.alert {
            let area = centered_rect(50, 25, size);
            alert::render(frame, area, message, &self.theme);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(16), Constraint::Min(10)])
            .split(area);

        let brand = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(format!(" {}", BRAND), self.theme.title_style())),
        ]);
        frame.render_widget(brand, chunks[0]);
        self.search_bar.render(frame, chunks[1], &self.theme);
    }

    fn render_toolbar(&self, frame: &mut Frame, area: Rect, model: &Model) {
        let mut spans = vec![
            Span::styled(" [a] Add Recipe", self.theme.button_style(model.popup_active)),
            Span::styled(
                "   Enter: view  d: remove  /: search  h: home  q: quit",
                self.theme.muted_style(),
            ),
        ];
        if !model.search_query.is_empty() {
            spans.push(Span::styled(
                format!("   Filter: \"{}\"", model.search_query),
                self.theme.text_style(),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Create centered rectangle for overlay
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
