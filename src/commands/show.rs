use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::Select;
use twacal_core::CalendarConfig;
use twacal_core::date::{format_iso_date, month_options, parse_month, start_of_month};

use super::sync::fetch_remote;
use super::{open_app, report_persist};
use crate::render::{render_legend, render_month};
use crate::utils::tui;

pub async fn run(
    config: &CalendarConfig,
    month: Option<String>,
    pick: bool,
    offline: bool,
) -> Result<()> {
    let mut app = open_app(config);

    if !offline {
        fetch_remote(&mut app, &config.remote_url).await;
    }

    if let Some(month) = month {
        app.go_to_month(parse_month(&month)?);
    } else if pick {
        app.go_to_month(pick_month(app.current_month())?);
    }

    app.show_todays_events();

    println!(
        "{}",
        render_month(&app.grid(), app.events(), app.today(), app.dark_theme())
    );
    println!("{}", render_legend());
    println!();
    tui::print_notices(&app.take_notices());
    report_persist(&app);

    Ok(())
}

/// Month picker over the five-year window around today.
fn pick_month(current: NaiveDate) -> Result<NaiveDate> {
    let options = month_options(current);
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    let current_value = format_iso_date(start_of_month(current));
    let default = options
        .iter()
        .position(|o| current_value.starts_with(&o.value))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("  Month")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(parse_month(&options[selection].value)?)
}
