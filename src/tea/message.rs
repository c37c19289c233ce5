/// Central message type for the recipe screen following TEA pattern
///
/// User actions and live-feed deliveries both arrive here, so every
/// state transition is a message handled by `update`.

use crate::recipe::{ListKind, Recipe};

/// Main application message type
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Application lifecycle
    System(SystemMessage),

    /// Live-feed deliveries
    Store(StoreMessage),

    /// Actions on a rendered recipe card
    Recipe(RecipeMessage),

    /// Creation popup and draft editing
    Draft(DraftMessage),

    /// Search bar output
    Search(SearchMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SystemMessage {
    /// Application should quit
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreMessage {
    /// A complete snapshot of the collection arrived
    SnapshotReceived(Vec<Recipe>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecipeMessage {
    /// Expand or collapse a card; expanding collapses every other card
    ToggleView(String),

    /// Delete the recipe from the collection
    Remove(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftMessage {
    /// "Add Recipe" button
    TogglePopup,

    /// Close without submitting; the draft is kept
    ClosePopup,

    SetTitle(String),

    SetDesc(String),

    /// Replace one ingredient or step
    EditListField {
        kind: ListKind,
        value: String,
        index: usize,
    },

    /// Remove one ingredient or step, shifting the rest left
    RemoveListElement { kind: ListKind, index: usize },

    /// Append a blank ingredient or step
    AppendListElement(ListKind),

    Submit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchMessage {
    /// Replace the active query
    Search(String),

    /// Clear the active query (home affordance)
    Reset,
}

impl From<SystemMessage> for Message {
    fn from(msg: SystemMessage) -> Self {
        Message::System(msg)
    }
}

impl From<StoreMessage> for Message {
    fn from(msg: StoreMessage) -> Self {
        Message::Store(msg)
    }
}

impl From<RecipeMessage> for Message {
    fn from(msg: RecipeMessage) -> Self {
        Message::Recipe(msg)
    }
}

impl From<DraftMessage> for Message {
    fn from(msg: DraftMessage) -> Self {
        Message::Draft(msg)
    }
}

impl From<SearchMessage> for Message {
    fn from(msg: SearchMessage) -> Self {
        Message::Search(msg)
    }
}
