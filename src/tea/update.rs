/// Update function for TEA pattern
///
/// Central update function that handles all messages and updates the model
/// accordingly. It never touches the store directly: writes leave as commands
/// and their results come back only through the live feed.

use crate::recipe::RecipeView;
use crate::tea::command::{StoreCommand, UICommand};
use crate::tea::message::{
    DraftMessage, Message, RecipeMessage, SearchMessage, StoreMessage, SystemMessage,
};
use crate::tea::{Command, Model, UpdateResult};

/// Alert shown when a submit is missing a required field
pub const INCOMPLETE_DRAFT_ALERT: &str = "Please fill out all fields";

/// Main update function that processes messages and returns updated model with commands
pub fn update(model: Model, message: Message) -> UpdateResult<Model> {
    match message {
        Message::System(msg) => update_system(model, msg),
        Message::Store(msg) => update_store(model, msg),
        Message::Recipe(msg) => update_recipe(model, msg),
        Message::Draft(msg) => update_draft(model, msg),
        Message::Search(msg) => update_search(model, msg),
    }
}

fn update_system(mut model: Model, message: SystemMessage) -> UpdateResult<Model> {
    match message {
        SystemMessage::Quit => {
            model.should_quit = true;
            UpdateResult::just_model(model)
        }
    }
}

/// Every snapshot replaces the list wholesale, collapsing any expanded card.
fn update_store(mut model: Model, message: StoreMessage) -> UpdateResult<Model> {
    match message {
        StoreMessage::SnapshotReceived(recipes) => {
            tracing::debug!("Snapshot received with {} recipes", recipes.len());
            model.recipes = recipes.into_iter().map(RecipeView::from).collect();
            UpdateResult::just_model(model)
        }
    }
}

fn update_recipe(mut model: Model, message: RecipeMessage) -> UpdateResult<Model> {
    match message {
        RecipeMessage::ToggleView(id) => {
            for view in model.recipes.iter_mut() {
                view.viewing = view.id() == id && !view.viewing;
            }
            UpdateResult::just_model(model)
        }

        RecipeMessage::Remove(id) => {
            UpdateResult::with_command(model, Command::store(StoreCommand::Delete(id)))
        }
    }
}

fn update_draft(mut model: Model, message: DraftMessage) -> UpdateResult<Model> {
    match message {
        DraftMessage::TogglePopup => {
            model.popup_active = !model.popup_active;
            UpdateResult::just_model(model)
        }

        DraftMessage::ClosePopup => {
            model.popup_active = false;
            UpdateResult::just_model(model)
        }

        DraftMessage::SetTitle(title) => {
            model.draft.title = title;
            UpdateResult::just_model(model)
        }

        DraftMessage::SetDesc(desc) => {
            model.draft.desc = desc;
            UpdateResult::just_model(model)
        }

        DraftMessage::EditListField { kind, value, index } => {
            if !model.draft.edit(kind, value, index) {
                tracing::debug!("Ignoring edit of {:?} {} (out of range)", kind, index);
            }
            UpdateResult::just_model(model)
        }

        DraftMessage::RemoveListElement { kind, index } => {
            if !model.draft.remove(kind, index) {
                tracing::debug!("Ignoring removal of {:?} {} (out of range)", kind, index);
            }
            UpdateResult::just_model(model)
        }

        DraftMessage::AppendListElement(kind) => {
            model.draft.append(kind);
            UpdateResult::just_model(model)
        }

        DraftMessage::Submit => {
            let fields = model.draft.fields();
            if !fields.is_complete() {
                return UpdateResult::with_command(
                    model,
                    Command::ui(UICommand::Alert(INCOMPLETE_DRAFT_ALERT.to_string())),
                );
            }

            // The draft resets as soon as the create is issued, not when it lands.
            model.draft = Default::default();
            model.popup_active = false;
            UpdateResult::with_command(model, Command::store(StoreCommand::Create(fields)))
        }
    }
}

fn update_search(mut model: Model, message: SearchMessage) -> UpdateResult<Model> {
    match message {
        SearchMessage::Search(query) => {
            model.search_query = query;
            UpdateResult::just_model(model)
        }

        SearchMessage::Reset => {
            model.search_query.clear();
            UpdateResult::just_model(model)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{ListKind, Recipe};

    fn recipe(id: &str, title: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: title.to_string(),
            desc: "desc".to_string(),
            ingredients: vec!["a".to_string()],
            steps: vec!["b".to_string()],
        }
    }

    fn loaded(ids: &[&str]) -> Model {
        let recipes = ids.iter().map(|id| recipe(id, id)).collect();
        update(Model::new(), StoreMessage::SnapshotReceived(recipes).into()).model
    }

    #[test]
    fn test_toggle_view_is_an_accordion() {
        let model = loaded(&["1", "2", "3"]);

        let model = update(model, RecipeMessage::ToggleView("1".into()).into()).model;
        assert!(model.find("1").unwrap().viewing);

        let model = update(model, RecipeMessage::ToggleView("2".into()).into()).model;
        assert!(!model.find("1").unwrap().viewing);
        assert!(model.find("2").unwrap().viewing);
        assert_eq!(model.expanded_count(), 1);

        let model = update(model, RecipeMessage::ToggleView("2".into()).into()).model;
        assert_eq!(model.expanded_count(), 0);
    }

    #[test]
    fn test_toggle_unknown_id_collapses_everything() {
        let model = loaded(&["1", "2"]);
        let model = update(model, RecipeMessage::ToggleView("1".into()).into()).model;
        let model = update(model, RecipeMessage::ToggleView("nope".into()).into()).model;
        assert_eq!(model.expanded_count(), 0);
    }

    #[test]
    fn test_remove_issues_delete_without_local_removal() {
        let model = loaded(&["1"]);
        let result = update(model, RecipeMessage::Remove("1".into()).into());

        assert_eq!(result.model.recipes.len(), 1);
        assert!(matches!(
            result.commands.as_slice(),
            [Command::Store(StoreCommand::Delete(id))] if id == "1"
        ));
    }

    #[test]
    fn test_closing_popup_keeps_draft() {
        let mut model = Model::new();
        model = update(model, DraftMessage::TogglePopup.into()).model;
        model = update(model, DraftMessage::SetTitle("Stew".into()).into()).model;
        model = update(model, DraftMessage::AppendListElement(ListKind::Step).into()).model;
        model = update(model, DraftMessage::ClosePopup.into()).model;
        assert!(!model.popup_active);

        model = update(model, DraftMessage::TogglePopup.into()).model;
        assert!(model.popup_active);
        assert_eq!(model.draft.title, "Stew");
        assert_eq!(model.draft.steps.len(), 1);
    }

    #[test]
    fn test_search_replaces_query_verbatim() {
        let model = update(Model::new(), SearchMessage::Search("  Soup ".into()).into()).model;
        assert_eq!(model.search_query, "  Soup ");

        let model = update(model, SearchMessage::Reset.into()).model;
        assert!(model.search_query.is_empty());
    }

    #[test]
    fn test_quit() {
        let model = update(Model::new(), SystemMessage::Quit.into()).model;
        assert!(model.should_quit);
    }
}
