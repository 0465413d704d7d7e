use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use twacal_core::CalendarConfig;
use twacal_core::backend::Backend;

use super::{login, open_app, report_persist};
use crate::render::Render;
use crate::utils::tui;

pub async fn run(
    config: &CalendarConfig,
    password: Option<String>,
    id: &str,
    force: bool,
) -> Result<()> {
    let mut app = open_app(config);
    login(&mut app, password)?;

    if !force {
        if let Some(event) = app.store().get(id) {
            println!("  {}", event.render());
        }
        let confirmed = Confirm::new()
            .with_prompt("  Delete this event?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let backend = Backend::from_config(&config.backend, config.poll_interval())?;
    let removed = app.delete_event_synced(&backend, id).await?;

    tui::print_notices(&app.take_notices());
    if removed == 0 {
        println!("  {}", format!("No event with id {id}").dimmed());
    }
    report_persist(&app);

    Ok(())
}
