pub mod add;
pub mod config;
pub mod day;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod show;
pub mod stats;
pub mod sync;
pub mod theme;
pub mod today;
pub mod watch;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use twacal_core::storage::FileStorage;
use twacal_core::{CalendarApp, CalendarConfig, EventStore};

use crate::utils::tui;

pub type App = CalendarApp<FileStorage>;

/// Open the calendar stored in the configured data directory.
pub fn open_app(config: &CalendarConfig) -> App {
    let store = EventStore::load(FileStorage::new(config.data_path()));
    CalendarApp::new(store, config.admin_password.clone(), config.today())
}

/// Log in as admin, prompting for the password when none was given.
pub fn login(app: &mut App, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("  Admin password: ")
            .context("Failed to read password")?,
    };

    let result = app.login(&password);
    tui::print_notices(&app.take_notices());
    Ok(result?)
}

/// Warn when the last write to the data directory failed.
pub fn report_persist(app: &App) {
    if let twacal_core::PersistStatus::Failed(e) = app.last_persist() {
        eprintln!("  {}", format!("Changes are not saved to disk: {e}").yellow());
    }
}
