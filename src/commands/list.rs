use anyhow::Result;
use owo_colors::OwoColorize;
use twacal_core::{CalendarConfig, EventKind};

use super::open_app;
use crate::render::{Render, render_dates};

pub fn run(config: &CalendarConfig, kind: Option<String>) -> Result<()> {
    let app = open_app(config);
    let kind = kind.as_deref().map(EventKind::from);

    let events: Vec<_> = app
        .events()
        .iter()
        .filter(|e| kind.as_ref().is_none_or(|k| &e.kind == k))
        .collect();

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{:<23} {}", render_dates(event), event.render());
    }
    println!("\n{}", format!("{} events", events.len()).dimmed());

    Ok(())
}
