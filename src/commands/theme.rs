use anyhow::Result;
use owo_colors::OwoColorize;
use twacal_core::CalendarConfig;

use super::open_app;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

pub fn run(config: &CalendarConfig, mode: Option<ThemeMode>) -> Result<()> {
    let mut app = open_app(config);

    let Some(mode) = mode else {
        let current = if app.dark_theme() { "dark" } else { "light" };
        println!("Theme: {}", current.bold());
        return Ok(());
    };

    let status = app.set_dark_theme(mode == ThemeMode::Dark);
    if let twacal_core::PersistStatus::Failed(e) = status {
        eprintln!("  {}", format!("Theme not saved: {e}").yellow());
    } else {
        println!("Theme set to {}", format!("{mode:?}").to_lowercase().bold());
    }

    Ok(())
}
