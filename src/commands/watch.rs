use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use twacal_core::CalendarConfig;
use twacal_core::backend::{Backend, DocumentStore};
use twacal_core::grid::MonthGrid;
use twacal_core::sync::follow_subscription;

use super::{open_app, report_persist};
use crate::render::render_month;

/// Follow the hosted backend, replacing the local calendar on every change,
/// until Ctrl-C. Reading the backend needs no admin login.
pub async fn run(config: &CalendarConfig) -> Result<()> {
    let backend = Backend::from_config(&config.backend, config.poll_interval())?;
    if !backend.is_enabled() {
        bail!(
            "No backend configured.\n\n\
            Set api_key and project_id under [backend] in:\n  {}",
            CalendarConfig::config_path()?.display()
        );
    }

    let mut app = open_app(config);

    let mut subscription = backend.subscribe().await?;
    println!("{}", "Watching for changes (Ctrl-C to stop)".dimmed());

    let grid = MonthGrid::new(app.today());
    let today = app.today();
    let stop = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let applied = follow_subscription(app.store_mut(), &mut subscription, stop, |store| {
        println!();
        println!(
            "{}",
            format!("↻ {} events from backend", store.len()).cyan()
        );
        println!(
            "{}",
            render_month(&grid, store.events(), today, store.dark_theme())
        );
    })
    .await;
    subscription.unsubscribe();

    println!("\n{}", format!("Stopped after {applied} updates").dimmed());
    report_persist(&app);

    Ok(())
}
