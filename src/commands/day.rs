use anyhow::Result;
use owo_colors::OwoColorize;
use twacal_core::date::parse_event_date;
use twacal_core::{CalendarConfig, CalendarError};

use super::open_app;
use crate::render::render_event_detail;

pub fn run(config: &CalendarConfig, date: Option<String>) -> Result<()> {
    let mut app = open_app(config);
    if let Some(text) = date {
        let date = parse_event_date(&text).ok_or(CalendarError::InvalidDate(text))?;
        app.select_date(date);
    }

    let date = app.selected_date().unwrap_or(app.today());
    println!("{}", date.format("%A, %B %-d, %Y").to_string().bold());

    let events = app.selected_events();
    if events.is_empty() {
        println!("  {}", "No events".dimmed());
        return Ok(());
    }

    for event in events {
        println!("{}", render_event_detail(event));
    }

    Ok(())
}
