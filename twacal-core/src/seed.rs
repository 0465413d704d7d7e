//! Built-in default collection used when local storage is empty or corrupt.

use tracing::warn;

use crate::event::{Event, EventKind};

/// Holidays, staff birthdays and the 2025-2026 school year.
const DEFAULT_EVENTS_JSON: &str = include_str!("../data/default_events.json");

/// The default seed, normalized.
pub fn default_events() -> Vec<Event> {
    match serde_json::from_str::<Vec<Event>>(DEFAULT_EVENTS_JSON) {
        Ok(events) => normalize_seed(events),
        Err(e) => {
            warn!("bundled default events are invalid: {e}");
            Vec::new()
        }
    }
}

/// Re-tag orientations and meetings as `meeting`, whatever their type.
///
/// Only the seed goes through this; events added later keep the type they
/// were given.
pub fn normalize_seed(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .map(|mut event| {
            if is_meeting_title(&event.title) {
                event.kind = EventKind::Meeting;
            }
            event
        })
        .collect()
}

fn is_meeting_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower.contains("orientation") || lower.contains("meeting")
}
