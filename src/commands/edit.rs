use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use twacal_core::{CalendarConfig, CalendarError, EventDraft, EventKind, Recurrence};

use super::add::{EventArgs, prompt_date, prompt_kind, prompt_text, prompt_title};
use super::{login, open_app, report_persist};
use crate::utils::tui;

/// Replace an event. Without field flags every field is prompted for, with
/// the current value as the default.
pub fn run(
    config: &CalendarConfig,
    password: Option<String>,
    id: &str,
    args: EventArgs,
) -> Result<()> {
    let mut app = open_app(config);
    login(&mut app, password)?;

    let existing = app
        .store()
        .get(id)
        .cloned()
        .ok_or_else(|| CalendarError::EventNotFound(id.to_string()))?;

    let mut draft = EventDraft::from(existing);
    if args.is_empty() {
        prompt_fields(&mut draft)?;
    } else {
        apply_args(&mut draft, args);
    }

    let event = app.save_event(Some(id), draft)?;

    tui::print_notices(&app.take_notices());
    println!("  {} {}", "Updated:".green(), event.title);
    report_persist(&app);

    Ok(())
}

fn apply_args(draft: &mut EventDraft, args: EventArgs) {
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(start) = args.start {
        draft.start = start;
    }
    if let Some(end) = args.end {
        draft.end = end;
    }
    if let Some(kind) = args.kind {
        draft.kind = EventKind::from(kind.as_str());
    }
    if let Some(location) = args.location {
        draft.location = location;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if args.annual {
        draft.recurring = Recurrence::Annual;
    }
}

fn prompt_fields(draft: &mut EventDraft) -> Result<()> {
    draft.title = prompt_title(Some(&draft.title))?;
    draft.start = prompt_date("  Start (YYYY-MM-DD)", Some(&draft.start))?;
    draft.end = prompt_text("  End", &draft.end)?;
    draft.kind = prompt_kind(&draft.kind)?;
    draft.location = prompt_text("  Where?", &draft.location)?;
    draft.description = prompt_text("  Description", &draft.description)?;

    let annual = Confirm::new()
        .with_prompt("  Repeat every year?")
        .default(draft.recurring == Recurrence::Annual)
        .interact()?;
    draft.recurring = if annual {
        Recurrence::Annual
    } else {
        Recurrence::None
    };

    Ok(())
}
