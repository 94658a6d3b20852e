mod app;
mod config;
mod sessions;
mod util;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::LaunchSettings;
use sessions::SessionSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON session list; the built-in demo sessions are shown when omitted.
    #[arg(long)]
    sessions: Option<PathBuf>,
    /// TOML file with logging and physics settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed seed for the initial layout jitter.
    #[arg(long)]
    seed: Option<u64>,
    /// Reload the session file whenever it changes on disk.
    #[arg(long)]
    watch: bool,
    #[arg(long)]
    log_level: Option<String>,
    /// Command run when a session is opened; `{id}` is replaced by the session id.
    #[arg(long)]
    open_command: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = config::AppConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    config.sanitize();

    let source = match args.sessions {
        Some(path) => SessionSource::File(path),
        None => SessionSource::Demo,
    };
    let settings = LaunchSettings {
        watch: args.watch,
        open_command: args.open_command,
    };
    info!(source = %source.describe(), seed = ?config.seed, "starting second brain");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Second Brain",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::SecondBrainApp::new(
                cc, source, config, settings,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run the graph window: {error}"))
}
