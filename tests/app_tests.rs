use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use recipebox::app::App;
use recipebox::config::AppConfig;
use recipebox::recipe::RecipeFields;
use recipebox::store::{MemoryCollection, RecipeStore};
use recipebox::tea::update::INCOMPLETE_DRAFT_ALERT;
use recipebox::ui::FocusedPane;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

fn fields(title: &str) -> RecipeFields {
    RecipeFields {
        title: title.to_string(),
        desc: "Hot".to_string(),
        ingredients: vec!["Water".to_string()],
        steps: vec!["Boil".to_string()],
    }
}

/// Drain until the model satisfies `done`, giving spawned tasks a chance to run
async fn settle<F>(app: &mut App, done: F)
where
    F: Fn(&App) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        app.drain_pending();
        if done(app) {
            return;
        }
        assert!(Instant::now() < deadline, "app never reached expected state");
        sleep(Duration::from_millis(10)).await;
    }
}

async fn started_app(store: Arc<MemoryCollection>) -> App {
    let mut app = App::new(store, &AppConfig::default());
    app.start().await.unwrap();
    app
}

#[tokio::test]
async fn test_start_delivers_existing_recipes() {
    let store = Arc::new(MemoryCollection::new("recipes").unwrap());
    store.create(fields("Soup")).await.unwrap();

    let mut app = started_app(Arc::clone(&store)).await;
    settle(&mut app, |app| app.model().recipes.len() == 1).await;

    assert_eq!(app.model().recipes[0].recipe.title, "Soup");
    assert!(!app.model().recipes[0].viewing);
}

#[tokio::test]
async fn test_form_submission_arrives_through_feed() {
    let store = Arc::new(MemoryCollection::new("recipes").unwrap());
    let mut app = started_app(Arc::clone(&store)).await;
    settle(&mut app, |_| true).await;

    app.handle_key(key(KeyCode::Char('a')));
    assert!(app.model().popup_active);

    type_text(&mut app, "Soup");
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "Hot");
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Enter)); // add ingredient row
    type_text(&mut app, "Water");
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Enter)); // add step row
    type_text(&mut app, "Boil");
    assert_eq!(app.model().draft.ingredients, vec!["Water"]);
    assert_eq!(app.model().draft.steps, vec!["Boil"]);

    app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

    // Draft clears before the store answers.
    assert!(!app.model().popup_active);
    assert!(app.model().draft.title.is_empty());

    settle(&mut app, |app| app.model().recipes.len() == 1).await;
    let created = &app.model().recipes[0].recipe;
    assert_eq!(created.title, "Soup");
    assert_eq!(created.desc, "Hot");
    assert_eq!(store.fetch_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_flush_completes_submit_issued_before_quit() {
    let store = Arc::new(MemoryCollection::new("recipes").unwrap());
    let mut app = App::new(Arc::clone(&store) as Arc<dyn RecipeStore>, &AppConfig::default());

    app.handle_key(key(KeyCode::Char('a')));
    type_text(&mut app, "Toast");
    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "Crisp");
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Enter));
    type_text(&mut app, "Bread");
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Enter));
    type_text(&mut app, "Heat");
    app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.model().should_quit);

    app.flush_writes().await;
    app.shutdown();

    let stored = store.fetch_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Toast");
}

#[tokio::test]
async fn test_incomplete_submission_raises_alert() {
    let store = Arc::new(MemoryCollection::new("recipes").unwrap());
    let mut app = started_app(Arc::clone(&store)).await;

    app.handle_key(key(KeyCode::Char('a')));
    type_text(&mut app, "Only a title");
    app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

    assert_eq!(app.ui().alert(), Some(INCOMPLETE_DRAFT_ALERT));
    assert!(app.model().popup_active);
    assert_eq!(app.model().draft.title, "Only a title");

    // Keys are swallowed until the alert is dismissed.
    app.handle_key(key(KeyCode::Char('x')));
    assert_eq!(app.model().draft.title, "Only a title");
    app.handle_key(key(KeyCode::Enter));
    assert!(app.ui().alert().is_none());

    sleep(Duration::from_millis(50)).await;
    app.drain_pending();
    assert!(store.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expanded_card_collapses_on_unrelated_change() {
    let store = Arc::new(MemoryCollection::new("recipes").unwrap());
    store.create(fields("Soup")).await.unwrap();
    let mut app = started_app(Arc::clone(&store)).await;
    settle(&mut app, |app| app.model().recipes.len() == 1).await;

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.model().expanded_count(), 1);

    // Another writer adds a recipe.
    store.create(fields("Cake")).await.unwrap();
    settle(&mut app, |app| app.model().recipes.len() == 2).await;

    assert_eq!(app.model().expanded_count(), 0);
}

#[tokio::test]
async fn test_remove_key_deletes_selected_recipe() {
    let store = Arc::new(MemoryCollection::new("recipes").unwrap());
    store.create(fields("Soup")).await.unwrap();
    let mut app = started_app(Arc::clone(&store)).await;
    settle(&mut app, |app| app.model().recipes.len() == 1).await;

    app.handle_key(key(KeyCode::Char('d')));
    // Still listed until the feed reports the deletion.
    assert_eq!(app.model().recipes.len(), 1);

    settle(&mut app, |app| app.model().recipes.is_empty()).await;
    assert!(store.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_then_home() {
    let store = Arc::new(MemoryCollection::new("recipes").unwrap());
    store.create(fields("Tomato Soup")).await.unwrap();
    store.create(fields("Cheesecake")).await.unwrap();
    let mut app = started_app(Arc::clone(&store)).await;
    settle(&mut app, |app| app.model().recipes.len() == 2).await;

    app.handle_key(key(KeyCode::Char('/')));
    assert_eq!(app.ui().focused_pane(), FocusedPane::Search);
    type_text(&mut app, "soup");
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.ui().focused_pane(), FocusedPane::RecipeList);
    assert_eq!(app.model().search_query, "soup");
    assert_eq!(app.model().visible_recipes().len(), 1);

    app.handle_key(key(KeyCode::Char('h')));
    assert!(app.model().search_query.is_empty());
    assert_eq!(app.model().visible_recipes().len(), 2);
    assert_eq!(app.ui().search_bar().input(), "soup");
}

#[tokio::test]
async fn test_shutdown_stops_feed() {
    let store = Arc::new(MemoryCollection::new("recipes").unwrap());
    let mut app = started_app(Arc::clone(&store)).await;
    settle(&mut app, |_| true).await;

    app.shutdown();
    app.shutdown();

    store.create(fields("After")).await.unwrap();
    sleep(Duration::from_millis(50)).await;
    app.drain_pending();
    assert!(app.model().recipes.is_empty());
}

#[tokio::test]
async fn test_quit_key() {
    let store = Arc::new(MemoryCollection::new("recipes").unwrap());
    let mut app = started_app(store).await;

    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.model().should_quit);
}
