use std::path::Path;

use anyhow::{Context, Result};
use twacal_core::CalendarConfig;

use super::{login, open_app, report_persist};
use crate::utils::tui;

/// Replace the whole calendar with the events in a JSON file.
pub fn run(config: &CalendarConfig, password: Option<String>, path: &Path) -> Result<()> {
    let mut app = open_app(config);
    login(&mut app, password)?;

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let result = app.import(&bytes);
    tui::print_notices(&app.take_notices());

    let count = result.with_context(|| format!("{} was not imported", path.display()))?;
    println!("  {count} events loaded");
    report_persist(&app);

    Ok(())
}
