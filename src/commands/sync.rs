use anyhow::Result;
use owo_colors::OwoColorize;
use twacal_core::CalendarConfig;
use twacal_core::remote::RemoteFeed;
use twacal_core::sync::{StartupSync, startup_sync};

use super::{App, open_app, report_persist};
use crate::utils::tui;

pub async fn run(config: &CalendarConfig) -> Result<()> {
    let mut app = open_app(config);

    match fetch_remote(&mut app, &config.remote_url).await {
        StartupSync::Replaced(count) => {
            tui::print_notices(&app.take_notices());
            println!("  {} events from {}", count, config.remote_url.dimmed());
        }
        StartupSync::Unchanged(reason) => {
            println!("{}", format!("Local calendar kept ({reason})").dimmed());
        }
        StartupSync::Cancelled => println!("{}", "Cancelled".dimmed()),
    }

    report_persist(&app);
    Ok(())
}

/// Fetch the remote feed once. Ctrl-C abandons the request and leaves local
/// data as it was.
pub async fn fetch_remote(app: &mut App, url: &str) -> StartupSync {
    let feed = RemoteFeed::new(url);
    let spinner = tui::create_spinner("Checking for calendar updates...".to_string());

    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let result = startup_sync(app.store_mut(), &feed, cancel).await;

    spinner.finish_and_clear();
    result
}
