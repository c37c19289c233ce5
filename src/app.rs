use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::events::EventHandler;
use crate::recipe::Recipe;
use crate::store::{RecipeStore, SubscriptionHandle};
use crate::tea::message::StoreMessage;
use crate::tea::{update, CommandExecutor, Message, Model};
use crate::theme::Theme;
use crate::ui::{markup::MarkupPolicy, UI};

/// Application shell: owns the model and the single live subscription
pub struct App {
    model: Model,
    ui: UI,
    event_handler: EventHandler,
    store: Arc<dyn RecipeStore>,
    executor: CommandExecutor,
    snapshot_rx: Option<mpsc::UnboundedReceiver<Vec<Recipe>>>,
    subscription: Option<SubscriptionHandle>,
    tick_rate: Duration,
}

impl App {
    pub fn new(store: Arc<dyn RecipeStore>, config: &AppConfig) -> Self {
        let theme = Theme::from_choice(config.ui.theme);
        let markup_policy = MarkupPolicy::from_config(config.ui.sanitize_descriptions);

        Self {
            model: Model::new(),
            ui: UI::new(theme, markup_policy),
            event_handler: EventHandler::new(),
            executor: CommandExecutor::new(Arc::clone(&store)),
            store,
            snapshot_rx: None,
            subscription: None,
            tick_rate: config.ui.tick_rate(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn ui(&self) -> &UI {
        &self.ui
    }

    /// Open the live feed. Only the first call subscribes.
    pub async fn start(&mut self) -> Result<()> {
        if self.subscription.is_some() {
            return Ok(());
        }

        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
        let handle = self
            .store
            .subscribe(snapshot_tx)
            .await
            .with_context(|| format!("Failed to subscribe to '{}'", self.store.collection()))?;

        tracing::info!("Subscribed to '{}'", self.store.collection());
        self.snapshot_rx = Some(snapshot_rx);
        self.subscription = Some(handle);
        Ok(())
    }

    /// Cancel the live feed. Safe to call more than once; only the first cancels.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.subscription.take() {
            handle.cancel();
            tracing::info!("Unsubscribed from '{}'", self.store.collection());
        }
        self.snapshot_rx = None;
    }

    /// Run one message through update, then execute its commands
    pub fn dispatch(&mut self, message: Message) {
        tracing::debug!("Dispatching {:?}", message);

        let model = std::mem::take(&mut self.model);
        let result = update(model, message);
        self.model = result.model;

        for command in result.commands {
            if let Some(ui_command) = self.executor.execute(command) {
                self.ui.apply(ui_command);
            }
        }
        self.ui.sync_with(&self.model);
    }

    /// Route a key press and dispatch whatever message it produces
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(message) = self.event_handler.handle_key_event(key, &mut self.ui, &self.model) {
            self.dispatch(message);
        }
    }

    /// Apply every snapshot that has arrived so far
    pub fn drain_pending(&mut self) {
        let mut snapshots = Vec::new();
        if let Some(rx) = self.snapshot_rx.as_mut() {
            while let Ok(snapshot) = rx.try_recv() {
                snapshots.push(snapshot);
            }
        }
        for snapshot in snapshots {
            self.dispatch(StoreMessage::SnapshotReceived(snapshot).into());
        }
    }

    /// Wait for store writes issued so far, so a quit does not cut them off
    pub async fn flush_writes(&mut self) {
        self.executor.flush().await;
    }

    pub async fn run(&mut self) -> Result<()> {
        // Check if we're running in a proper terminal
        if !io::stdout().is_tty() {
            return Err(anyhow::anyhow!(
                "recipebox requires a proper terminal (TTY) to run. Please run this application in a terminal emulator."
            ));
        }

        self.start().await?;

        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

        // Run the main loop
        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.flush_writes().await;
        self.shutdown();
        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let mut last_tick = Instant::now();

        loop {
            self.drain_pending();

            // Draw UI
            let (model, ui) = (&self.model, &mut self.ui);
            terminal.draw(|f| ui.render(f, model))?;

            if self.model.should_quit {
                break;
            }

            // Handle events
            let timeout = self
                .tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if last_tick.elapsed() >= self.tick_rate {
                last_tick = Instant::now();
            }
        }

        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
