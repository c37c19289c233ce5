/// Application model following TEA pattern
///
/// Holds everything the recipe screen owns: the last snapshot, the draft
/// behind the creation popup, popup visibility and the active search query.

use crate::recipe::{filter_by_title, Draft, RecipeView};

/// Main application model containing all state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Last snapshot received from the live feed
    pub recipes: Vec<RecipeView>,

    /// In-progress recipe behind the creation popup
    pub draft: Draft,

    /// Whether the creation popup is open
    pub popup_active: bool,

    /// Query applied to recipe titles
    pub search_query: String,

    /// Whether the application should quit
    pub should_quit: bool,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipes matching the current query. Recomputed on every call.
    pub fn visible_recipes(&self) -> Vec<&RecipeView> {
        filter_by_title(&self.recipes, &self.search_query)
    }

    pub fn find(&self, id: &str) -> Option<&RecipeView> {
        self.recipes.iter().find(|view| view.id() == id)
    }

    /// Number of expanded cards; never more than one
    pub fn expanded_count(&self) -> usize {
        self.recipes.iter().filter(|view| view.viewing).count()
    }
}
