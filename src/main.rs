use anyhow::{Context, Result};
use clap::Parser;
use recipebox::app::App;
use recipebox::cli::{Cli, CliHandler};
use recipebox::config::AppConfig;
use recipebox::store::open_store;
use recipebox::ui::markup::MarkupPolicy;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);

    let store = open_store(&config.store)
        .await
        .context("Failed to open recipe store")?;

    // Handle CLI commands
    if let Some(command) = cli.command {
        let handler = CliHandler::new(
            store,
            MarkupPolicy::from_config(config.ui.sanitize_descriptions),
        );
        return handler.handle_command(command, cli.dry_run).await;
    }

    // Run the application
    let mut app = App::new(store, &config);
    app.run().await
}

/// Initialize tracing for logging - write to file to avoid interfering with TUI
fn init_logging(cli: &Cli) -> Result<()> {
    let path = cli.log_file.clone().unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let default_level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(Arc::new(log_file))
        .with_ansi(false) // Disable ANSI colors in log file
        .with_env_filter(filter)
        .init();

    if cli.debug {
        tracing::info!("Debug mode enabled - verbose logging active");
    }
    Ok(())
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("recipebox")
        .join("recipebox.log")
}
