use crate::api::{self, Fetcher};
use crate::config::Config;
use crate::dashboard::{self, Dashboard, DashboardHandle, Snapshot};
use crate::event::{Event, EventHandler};
use crate::ui::{self, view::View, view::ViewAction, TransactionsView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::info;

/// Main application state
pub struct App {
  /// Application configuration
  config: Config,

  /// Command sender and state reader for the dashboard worker
  dashboard: DashboardHandle,

  view: TransactionsView,

  /// Data source shown in the header
  source: String,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let provider = api::provider_from_config(&config)?;
    let fetcher = Fetcher::new(provider, config.cache.enabled);
    let source = fetcher.provider_label();
    info!(%source, cache = config.cache.enabled, "starting");

    let dashboard = dashboard::spawn(Dashboard::new(fetcher));

    Ok(Self {
      config,
      dashboard,
      view: TransactionsView::new(),
      source,
      should_quit: false,
    })
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn view_mut(&mut self) -> &mut TransactionsView {
    &mut self.view
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = match Terminal::new(CrosstermBackend::new(stdout())) {
      Ok(mut terminal) => self.main_loop(&mut terminal).await,
      Err(e) => Err(e.into()),
    };

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(100));

    while !self.should_quit {
      let snapshot = self.dashboard.view().snapshot();

      let action = self.view.tick(&snapshot);
      self.apply(action);

      terminal.draw(|frame| ui::draw(frame, self, &snapshot))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key, &snapshot),
        Some(Event::Tick) => {} // Redraw picks up worker progress
        None => break,
      }
    }

    Ok(())
  }

  /// Keys act on the snapshot that was drawn, so a toggle targets the row
  /// the user saw
  fn handle_key(&mut self, key: KeyEvent, snapshot: &Snapshot) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let action = self.view.handle_key(key, snapshot);
    self.apply(action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Dispatch(command) => self.dashboard.send(command),
      ViewAction::Quit => self.should_quit = true,
    }
  }
}
