use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::recipe::RecipeView;
use crate::tea::Model;
use crate::theme::Theme;
use crate::ui::markup::{render_description, MarkupPolicy};

/// Card list over the filtered recipes
///
/// The selection indexes the *visible* list, so it is clamped whenever a
/// snapshot or a query change shrinks it.
#[derive(Debug, Default)]
pub struct RecipeList {
    state: ListState,
}

impl RecipeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.state.select(None);
            return;
        }
        let next = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.state.select(Some(next));
    }

    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.state.select(None);
            return;
        }
        let previous = match self.state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.state.select(Some(previous));
    }

    /// Keep the selection inside the visible list
    pub fn clamp(&mut self, len: usize) {
        self.state.select(match (self.state.selected(), len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        });
    }

    /// Id of the selected card in the filtered view
    pub fn selected_id(&self, model: &Model) -> Option<String> {
        let visible = model.visible_recipes();
        self.state
            .selected()
            .and_then(|i| visible.get(i))
            .map(|view| view.id().to_string())
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        model: &Model,
        theme: &Theme,
        policy: MarkupPolicy,
        focused: bool,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("My Recipes")
            .border_style(theme.border_style(focused));

        let visible = model.visible_recipes();
        if visible.is_empty() {
            let message = if model.recipes.is_empty() {
                "No recipes yet. Press 'a' to add one."
            } else {
                "No recipes match your search."
            };
            let empty = Paragraph::new(Span::styled(message, theme.muted_style())).block(block);
            frame.render_widget(empty, area);
            return;
        }

        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = visible
            .iter()
            .map(|view| ListItem::new(card_text(view, theme, policy, width)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_symbol("▌ ")
            .highlight_style(ratatui::style::Style::default().add_modifier(Modifier::BOLD));

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

/// Lines of one recipe card
pub fn card_text(view: &RecipeView, theme: &Theme, policy: MarkupPolicy, width: usize) -> Text<'static> {
    let recipe = &view.recipe;
    let mut lines = vec![Line::from(Span::styled(
        recipe.title.clone(),
        theme.title_style(),
    ))];

    lines.extend(render_description(&recipe.desc, policy, width, theme.text_style()).lines);

    if view.viewing {
        lines.push(Line::from(Span::styled("Ingredients", theme.title_style())));
        for ingredient in &recipe.ingredients {
            lines.push(Line::from(format!("  • {}", ingredient)));
        }

        lines.push(Line::from(Span::styled("Steps", theme.title_style())));
        for (i, step) in recipe.steps.iter().enumerate() {
            lines.push(Line::from(format!("  {}. {}", i + 1, step)));
        }
    }

    lines.push(Line::from(vec![
        Span::styled(format!("[{}]", view.view_label()), theme.button_style(false)),
        Span::raw(" "),
        Span::styled("[Remove]", theme.danger_style()),
    ]));
    lines.push(Line::from(""));

    Text::from(lines)
}
