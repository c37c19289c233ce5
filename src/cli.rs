use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::recipe::{Recipe, RecipeFields, RecipeView};
use crate::store::RecipeStore;
use crate::tea::update::INCOMPLETE_DRAFT_ALERT;
use crate::ui::markup::{render_description_text, MarkupPolicy};

const LIST_WIDTH: usize = 72;

/// recipebox - Terminal recipe manager
#[derive(Parser, Debug)]
#[command(name = "recipebox")]
#[command(about = "A terminal recipe manager with a live-synced recipe collection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Recipe database file (overrides the config file)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Use a throwaway in-memory collection
    #[arg(long, global = true)]
    pub memory: bool,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Dry run mode (don't make changes)
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Print recipes, optionally filtered by title
    List {
        /// Case-insensitive title filter
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Add a recipe without opening the interface
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        desc: String,

        /// Ingredient, repeat for several
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,

        /// Step, repeat for several (kept in order)
        #[arg(long = "step")]
        steps: Vec<String>,
    },

    /// Remove recipes by id
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if self.memory {
            config.store.backend = StoreBackend::Memory;
        }
        if let Some(path) = &self.database {
            config.store.backend = StoreBackend::Sqlite;
            config.store.database_path = Some(path.clone());
        }
    }
}

/// Runs subcommands against the configured collection
pub struct CliHandler {
    store: Arc<dyn RecipeStore>,
    markup_policy: MarkupPolicy,
}

impl CliHandler {
    pub fn new(store: Arc<dyn RecipeStore>, markup_policy: MarkupPolicy) -> Self {
        Self {
            store,
            markup_policy,
        }
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands, dry_run: bool) -> Result<()> {
        match command {
            Commands::List { query } => {
                let recipes = self.list(query.as_deref().unwrap_or("")).await?;
                if recipes.is_empty() {
                    println!("No recipes found");
                }
                for recipe in &recipes {
                    println!("{}", format_recipe(recipe, self.markup_policy));
                }
                Ok(())
            }
            Commands::Add {
                title,
                desc,
                ingredients,
                steps,
            } => {
                let fields = RecipeFields {
                    title,
                    desc,
                    ingredients,
                    steps,
                };
                if dry_run {
                    validate_fields(&fields)?;
                    println!("Dry run: would add '{}'", fields.title);
                    return Ok(());
                }
                let id = self.add(fields).await?;
                println!("Added recipe {}", id);
                Ok(())
            }
            Commands::Remove { ids } => {
                if dry_run {
                    println!("Dry run: would remove {}", ids.join(", "));
                    return Ok(());
                }
                self.remove(&ids).await?;
                for id in &ids {
                    println!("Removed recipe {}", id);
                }
                Ok(())
            }
        }
    }

    /// Current snapshot filtered the same way as the interface
    pub async fn list(&self, query: &str) -> Result<Vec<Recipe>> {
        let views: Vec<RecipeView> = self
            .store
            .fetch_all()
            .await?
            .into_iter()
            .map(RecipeView::from)
            .collect();

        Ok(crate::recipe::filter_by_title(&views, query)
            .into_iter()
            .map(|view| view.recipe.clone())
            .collect())
    }

    pub async fn add(&self, fields: RecipeFields) -> Result<String> {
        validate_fields(&fields)?;
        Ok(self.store.create(fields).await?)
    }

    /// Delete several documents concurrently; unknown ids are not an error
    pub async fn remove(&self, ids: &[String]) -> Result<()> {
        try_join_all(ids.iter().map(|id| self.store.delete(id))).await?;
        Ok(())
    }
}

fn validate_fields(fields: &RecipeFields) -> Result<()> {
    if fields.is_complete() {
        Ok(())
    } else {
        Err(anyhow!(INCOMPLETE_DRAFT_ALERT))
    }
}

/// Plain-text rendering of one recipe for terminal output
pub fn format_recipe(recipe: &Recipe, policy: MarkupPolicy) -> String {
    let mut out = format!("{}  ({})\n", recipe.title, recipe.id);

    let desc = render_description_text(&recipe.desc, policy, LIST_WIDTH);
    for line in desc.lines() {
        out.push_str(&format!("  {}\n", line));
    }

    out.push_str("  Ingredients:\n");
    for ingredient in &recipe.ingredients {
        out.push_str(&format!("    - {}\n", ingredient));
    }

    out.push_str("  Steps:\n");
    for (i, step) in recipe.steps.iter().enumerate() {
        out.push_str(&format!("    {}. {}\n", i + 1, step));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCollection;

    fn handler() -> CliHandler {
        CliHandler::new(
            Arc::new(MemoryCollection::new("recipes").unwrap()),
            MarkupPolicy::Trusted,
        )
    }

    fn fields(title: &str) -> RecipeFields {
        RecipeFields {
            title: title.to_string(),
            desc: "Hot".to_string(),
            ingredients: vec!["Water".to_string()],
            steps: vec!["Boil".to_string(), "Serve".to_string()],
        }
    }

    #[test]
    fn test_parse_add_keeps_repeated_flags_in_order() {
        let cli = Cli::parse_from([
            "recipebox", "add", "--title", "Soup", "--desc", "Hot", "--ingredient", "Water",
            "--step", "Boil", "--step", "Serve",
        ]);
        assert_eq!(
            cli.command,
            Some(Commands::Add {
                title: "Soup".to_string(),
                desc: "Hot".to_string(),
                ingredients: vec!["Water".to_string()],
                steps: vec!["Boil".to_string(), "Serve".to_string()],
            })
        );
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from(["recipebox", "--database", "/tmp/r.db"]);
        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::Memory;
        cli.apply_overrides(&mut config);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.database_path, Some(PathBuf::from("/tmp/r.db")));

        let cli = Cli::parse_from(["recipebox", "--memory"]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[tokio::test]
    async fn test_add_validates_presence() {
        let handler = handler();
        let mut incomplete = fields("Soup");
        incomplete.steps.clear();

        let err = handler.add(incomplete).await.unwrap_err();
        assert_eq!(err.to_string(), INCOMPLETE_DRAFT_ALERT);
        assert!(handler.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_title() {
        let handler = handler();
        handler.add(fields("Tomato Soup")).await.unwrap();
        handler.add(fields("Cheesecake")).await.unwrap();

        let found = handler.list("SOUP").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Tomato Soup");
        assert_eq!(handler.list("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_remove_several_ids() {
        let handler = handler();
        let soup = handler.add(fields("Soup")).await.unwrap();
        let cake = handler.add(fields("Cake")).await.unwrap();
        handler.add(fields("Stew")).await.unwrap();

        handler
            .remove(&[soup, cake, "missing".to_string()])
            .await
            .unwrap();

        let left = handler.list("").await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "Stew");
    }

    #[test]
    fn test_parse_remove_requires_an_id() {
        assert!(Cli::try_parse_from(["recipebox", "remove"]).is_err());
        let cli = Cli::parse_from(["recipebox", "remove", "a", "b"]);
        assert_eq!(
            cli.command,
            Some(Commands::Remove {
                ids: vec!["a".to_string(), "b".to_string()]
            })
        );
    }

    #[test]
    fn test_format_recipe_numbers_steps() {
        let recipe = Recipe::from_fields("1".to_string(), fields("Soup"));
        let text = format_recipe(&recipe, MarkupPolicy::Trusted);
        assert!(text.starts_with("Soup  (1)\n"));
        assert!(text.contains("    - Water\n"));
        assert!(text.contains("    1. Boil\n    2. Serve\n"));
    }
}
