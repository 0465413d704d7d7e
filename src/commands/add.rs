use anyhow::Result;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;
use twacal_core::backend::Backend;
use twacal_core::date::parse_event_date;
use twacal_core::{CalendarConfig, CalendarError, EventDraft, EventKind, Recurrence};

use super::{login, open_app, report_persist};
use crate::utils::tui;

/// Event fields given on the command line. Anything missing is prompted for.
#[derive(clap::Args, Debug, Default)]
pub struct EventArgs {
    /// Title of the event
    pub title: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD), defaults to the start date
    #[arg(short, long)]
    pub end: Option<String>,

    /// event, holiday, birthday, exam or meeting
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Repeat on the same day every year
    #[arg(long)]
    pub annual: bool,
}

impl EventArgs {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.kind.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && !self.annual
    }
}

pub async fn run(config: &CalendarConfig, password: Option<String>, args: EventArgs) -> Result<()> {
    let mut app = open_app(config);
    login(&mut app, password)?;

    let interactive = args.title.is_none() || args.start.is_none();

    let title = match args.title {
        Some(t) => t,
        None => prompt_title(None)?,
    };

    let start = match args.start {
        Some(s) => {
            check_date(&s)?;
            s
        }
        None => prompt_date("  Start (YYYY-MM-DD)", None)?,
    };

    let end = match args.end {
        Some(e) => {
            check_date(&e)?;
            e
        }
        None if interactive => prompt_optional_date("  End (same day)")?,
        None => String::new(),
    };

    let kind = match args.kind {
        Some(k) => EventKind::from(k.as_str()),
        None if interactive => prompt_kind(&EventKind::Event)?,
        None => EventKind::Event,
    };

    let location = match args.location {
        Some(l) => l,
        None if interactive => prompt_text("  Where? (skip)", "")?,
        None => String::new(),
    };

    let draft = EventDraft {
        end: if end.is_empty() { start.clone() } else { end },
        title,
        kind,
        start,
        location,
        description: args.description.unwrap_or_default(),
        recurring: if args.annual {
            Recurrence::Annual
        } else {
            Recurrence::None
        },
    };

    let backend = Backend::from_config(&config.backend, config.poll_interval())?;
    let event = app.add_event_synced(&backend, draft).await?;

    if interactive {
        println!();
    }
    tui::print_notices(&app.take_notices());
    println!("  {} {}", "Created:".green(), event.title);
    println!("  {}", format!("id {}", event.id).dimmed());
    report_persist(&app);

    Ok(())
}

fn check_date(text: &str) -> Result<()> {
    match parse_event_date(text) {
        Some(_) => Ok(()),
        None => Err(CalendarError::InvalidDate(text.to_string()).into()),
    }
}

/// Prompt for a title until a non-blank one is given.
pub fn prompt_title(current: Option<&str>) -> Result<String> {
    loop {
        let mut input = Input::<String>::new().with_prompt("  Title");
        if let Some(current) = current {
            input = input.default(current.to_string());
        }
        let title = input.allow_empty(true).interact_text()?;
        if !title.trim().is_empty() {
            return Ok(title);
        }
        eprintln!("  {}", "Please enter a title".red());
    }
}

/// Prompt for a date with retry on parse errors.
pub fn prompt_date(prompt: &str, current: Option<&str>) -> Result<String> {
    loop {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(current) = current {
            input = input.default(current.to_string());
        }
        let text = input.interact_text()?;
        match check_date(&text) {
            Ok(()) => return Ok(text.trim().to_string()),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

/// Like [`prompt_date`], but an empty answer is allowed.
pub fn prompt_optional_date(prompt: &str) -> Result<String> {
    loop {
        let text = prompt_text(prompt, "")?;
        if text.is_empty() {
            return Ok(text);
        }
        match check_date(&text) {
            Ok(()) => return Ok(text),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

pub fn prompt_text(prompt: &str, current: &str) -> Result<String> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .default(current.to_string())
        .show_default(!current.is_empty())
        .allow_empty(true)
        .interact_text()?;
    Ok(text.trim().to_string())
}

pub fn prompt_kind(current: &EventKind) -> Result<EventKind> {
    let labels: Vec<String> = EventKind::ALL.iter().map(EventKind::label).collect();
    let default = EventKind::ALL
        .iter()
        .position(|k| k == current)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("  Type")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(EventKind::ALL[selection].clone())
}
