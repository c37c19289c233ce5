use serde::{Deserialize, Serialize};

/// A recipe as it exists in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl Recipe {
    pub fn from_fields(id: String, fields: RecipeFields) -> Self {
        Self {
            id,
            title: fields.title,
            desc: fields.desc,
            ingredients: fields.ingredients,
            steps: fields.steps,
        }
    }

    /// Case-insensitive substring match against the title
    pub fn title_matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Document body written to the collection. Absent fields read back as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeFields {
    pub title: String,
    pub desc: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl From<&Recipe> for RecipeFields {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            desc: recipe.desc.clone(),
            ingredients: recipe.ingredients.clone(),
            steps: recipe.steps.clone(),
        }
    }
}

impl RecipeFields {
    /// Presence check used before a create. List elements themselves are not
    /// inspected, so `[""]` counts as a filled ingredient list.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty()
            && !self.desc.is_empty()
            && !self.ingredients.is_empty()
            && !self.steps.is_empty()
    }
}

/// Client-side view of a recipe. `viewing` is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub viewing: bool,
}

impl From<Recipe> for RecipeView {
    fn from(recipe: Recipe) -> Self {
        Self {
            recipe,
            viewing: false,
        }
    }
}

impl RecipeView {
    pub fn id(&self) -> &str {
        &self.recipe.id
    }

    pub fn view_label(&self) -> &'static str {
        if self.viewing {
            "View Less"
        } else {
            "View More"
        }
    }
}

/// Which of the draft's variable-length lists an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Ingredient,
    Step,
}

impl ListKind {
    pub fn label(&self) -> &'static str {
        match self {
            ListKind::Ingredient => "Ingredient",
            ListKind::Step => "Step",
        }
    }
}

/// The in-progress recipe behind the creation popup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub desc: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl Draft {
    pub fn list(&self, kind: ListKind) -> &[String] {
        match kind {
            ListKind::Ingredient => &self.ingredients,
            ListKind::Step => &self.steps,
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut Vec<String> {
        match kind {
            ListKind::Ingredient => &mut self.ingredients,
            ListKind::Step => &mut self.steps,
        }
    }

    /// Replace the element at `index`. Returns false when out of range.
    pub fn edit(&mut self, kind: ListKind, value: String, index: usize) -> bool {
        match self.list_mut(kind).get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Remove the element at `index`, shifting the rest left
    pub fn remove(&mut self, kind: ListKind, index: usize) -> bool {
        let list = self.list_mut(kind);
        if index < list.len() {
            list.remove(index);
            true
        } else {
            false
        }
    }

    pub fn append(&mut self, kind: ListKind) {
        self.list_mut(kind).push(String::new());
    }

    pub fn fields(&self) -> RecipeFields {
        RecipeFields {
            title: self.title.clone(),
            desc: self.desc.clone(),
            ingredients: self.ingredients.clone(),
            steps: self.steps.clone(),
        }
    }
}

/// Recipes whose title contains `query`, case-insensitively. Empty query keeps all.
pub fn filter_by_title<'a>(recipes: &'a [RecipeView], query: &str) -> Vec<&'a RecipeView> {
    recipes
        .iter()
        .filter(|view| view.recipe.title_matches(query))
        .collect()
}
