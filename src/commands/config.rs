use anyhow::Result;
use owo_colors::OwoColorize;
use twacal_core::CalendarConfig;
use twacal_core::constants::{EVENTS_KEY, THEME_KEY};

pub fn run(config: &CalendarConfig) -> Result<()> {
    let config_path = CalendarConfig::config_path()?;
    let data_path = config.data_path();

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Events:  {}", data_path.join(EVENTS_KEY).display());
    println!("  Theme:   {}", data_path.join(THEME_KEY).display());

    println!("\n{}", "Settings".bold());
    for line in config.to_redacted_toml()?.lines() {
        println!("  {line}");
    }

    let backend = if config.backend.is_enabled() {
        "enabled".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    };
    println!("\n{} {}", "Backend:".bold(), backend);

    Ok(())
}
