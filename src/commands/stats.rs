use anyhow::Result;
use twacal_core::CalendarConfig;

use super::open_app;
use crate::render::render_stats;

pub fn run(config: &CalendarConfig) -> Result<()> {
    let app = open_app(config);
    println!("{}", render_stats(&app.counts_by_kind(), app.events().len()));
    Ok(())
}
