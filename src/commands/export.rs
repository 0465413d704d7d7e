use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use twacal_core::CalendarConfig;

use super::{login, open_app};

pub fn run(config: &CalendarConfig, password: Option<String>, path: Option<PathBuf>) -> Result<()> {
    let mut app = open_app(config);
    login(&mut app, password)?;

    let path = path.unwrap_or_else(|| PathBuf::from("events.json"));
    let bytes = app.export()?;
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "  {} {} events to {}",
        "Exported".green(),
        app.events().len(),
        path.display()
    );
    Ok(())
}
