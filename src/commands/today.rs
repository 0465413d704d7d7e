use anyhow::Result;
use owo_colors::OwoColorize;
use twacal_core::CalendarConfig;

use super::open_app;
use crate::utils::tui;

pub fn run(config: &CalendarConfig) -> Result<()> {
    let mut app = open_app(config);

    if app.show_todays_events() {
        tui::print_notices(&app.take_notices());
    } else {
        println!("{}", "No events today".dimmed());
    }

    Ok(())
}
