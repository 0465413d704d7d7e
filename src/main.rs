mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use twacal_core::CalendarConfig;

use commands::add::EventArgs;
use commands::theme::ThemeMode;

#[derive(Parser)]
#[command(name = "twacal")]
#[command(about = "Browse the school event calendar and manage its events")]
#[command(version)]
struct Cli {
    /// Admin password for commands that change events (prompted if missing)
    #[arg(long, global = true, env = "TWACAL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid (the current month by default)
    Show {
        /// Month to show (YYYY-MM)
        #[arg(short, long, conflicts_with = "pick")]
        month: Option<String>,

        /// Choose the month from a list
        #[arg(long)]
        pick: bool,

        /// Skip checking the remote feed
        #[arg(long)]
        offline: bool,
    },
    /// List the events on one day (today by default)
    Day { date: Option<String> },
    /// List every event
    List {
        /// Only events of this type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
    /// Count events per type
    Stats,
    /// Summarize today's events
    Today,
    /// Add an event (admin)
    Add {
        #[command(flatten)]
        event: EventArgs,
    },
    /// Edit an event (admin)
    Edit {
        id: String,

        #[command(flatten)]
        event: EventArgs,
    },
    /// Delete an event (admin)
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Write all events to a JSON file (admin)
    Export { path: Option<PathBuf> },
    /// Replace all events with those in a JSON file (admin)
    Import { path: PathBuf },
    /// Load events from the remote feed
    Sync,
    /// Follow the hosted backend until Ctrl-C
    Watch,
    /// Show or set the color theme
    Theme { mode: Option<ThemeMode> },
    /// Show config paths and settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = CalendarConfig::load()?;
    tracing::debug!(data_dir = %config.data_path().display(), "configuration loaded");

    let password = cli.password;
    let command = cli.command.unwrap_or(Commands::Show {
        month: None,
        pick: false,
        offline: false,
    });

    match command {
        Commands::Show {
            month,
            pick,
            offline,
        } => commands::show::run(&config, month, pick, offline).await,
        Commands::Day { date } => commands::day::run(&config, date),
        Commands::List { kind } => commands::list::run(&config, kind),
        Commands::Stats => commands::stats::run(&config),
        Commands::Today => commands::today::run(&config),
        Commands::Add { event } => commands::add::run(&config, password, event).await,
        Commands::Edit { id, event } => commands::edit::run(&config, password, &id, event),
        Commands::Delete { id, force } => {
            commands::delete::run(&config, password, &id, force).await
        }
        Commands::Export { path } => commands::export::run(&config, password, path),
        Commands::Import { path } => commands::import::run(&config, password, &path),
        Commands::Sync => commands::sync::run(&config).await,
        Commands::Watch => commands::watch::run(&config).await,
        Commands::Theme { mode } => commands::theme::run(&config, mode),
        Commands::Config => commands::config::run(&config),
    }
}
