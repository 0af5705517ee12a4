mod api;
mod app;
mod cache;
mod config;
mod dashboard;
mod event;
mod logging;
mod store;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "txreview")]
#[command(about = "A terminal UI for reviewing and approving finance transactions")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/txreview/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Use the built-in mock provider
  #[arg(short, long, conflicts_with = "url")]
  mock: bool,

  /// Base URL of the transactions API
  #[arg(short, long)]
  url: Option<String>,

  /// Fixture file for the mock provider
  #[arg(short, long, conflicts_with = "url")]
  fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration, then let the command line pick the provider
  let config = config::Config::load(args.config.as_deref())?
    .with_overrides(args.url, args.mock, args.fixture);

  let _log_guard = logging::init(&config)?;

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
