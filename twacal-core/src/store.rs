//! The event collection and its persistence.
//!
//! `EventStore` exclusively owns the collection. Every mutation writes the
//! whole collection back to storage; a failed write is logged and recorded
//! in [`PersistStatus`] but never undoes the in-memory change.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constants::{EVENTS_KEY, EVENT_ID_PREFIX, THEME_KEY};
use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventDraft, EventKind};
use crate::feedback::{Feedback, NoticeLevel};
use crate::grid::events_on_date;
use crate::seed::default_events;
use crate::storage::Storage;

/// Outcome of the most recent write to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    NotAttempted,
    Saved,
    Failed(String),
}

impl PersistStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, PersistStatus::Failed(_))
    }
}

pub struct EventStore<S: Storage> {
    events: Vec<Event>,
    storage: S,
    feedback: Feedback,
    last_persist: PersistStatus,
}

impl<S: Storage> EventStore<S> {
    /// Load the persisted collection, or the default seed if there is none
    /// or it cannot be read.
    pub fn load(storage: S) -> Self {
        let events = match storage.get(EVENTS_KEY) {
            Ok(Some(raw)) => match parse_events(raw.as_bytes()) {
                Ok(events) => normalize_ids(events),
                Err(e) => {
                    warn!("stored events are unreadable, using defaults: {e}");
                    default_events()
                }
            },
            Ok(None) => {
                debug!("no stored events, using defaults");
                default_events()
            }
            Err(e) => {
                warn!("could not read stored events, using defaults: {e}");
                default_events()
            }
        };

        EventStore {
            events,
            storage,
            feedback: Feedback::new(),
            last_persist: PersistStatus::NotAttempted,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events on `date`, in collection order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        events_on_date(&self.events, date)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn last_persist(&self) -> &PersistStatus {
        &self.last_persist
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut Feedback {
        &mut self.feedback
    }

    // MUTATIONS:

    /// Append a new event with a fresh id.
    pub fn add(&mut self, draft: EventDraft) -> Event {
        let taken: HashSet<String> = self.events.iter().map(|e| e.id.clone()).collect();
        let event = draft.into_event(mint_id(&taken));
        info!(id = %event.id, title = %event.title, "event added");

        self.events.push(event.clone());
        self.persist();
        self.feedback.show("✓ Event added", NoticeLevel::Success);
        event
    }

    /// Replace the record with the same id. Returns false, and leaves the
    /// collection as it was, when no record matches.
    pub fn update(&mut self, event: Event) -> bool {
        let mut matched = false;
        for existing in self.events.iter_mut().filter(|e| e.id == event.id) {
            *existing = event.clone();
            matched = true;
        }
        if matched {
            info!(id = %event.id, "event updated");
        } else {
            debug!(id = %event.id, "update matched no event");
        }

        self.persist();
        self.feedback.show("✓ Event updated", NoticeLevel::Success);
        matched
    }

    /// Remove every record with this id. Deleting an unknown id is not an
    /// error. Returns how many records were removed.
    pub fn delete(&mut self, id: &str) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = before - self.events.len();
        info!(id, removed, "event deleted");

        self.persist();
        self.feedback.show("✓ Event deleted", NoticeLevel::Success);
        removed
    }

    /// Swap in a whole new collection. Missing and duplicate ids are
    /// replaced with fresh ones.
    pub fn replace_all(&mut self, events: Vec<Event>) {
        info!(count = events.len(), "replacing event collection");
        self.events = normalize_ids(events);
        self.persist();
    }

    /// The full collection as pretty-printed JSON.
    pub fn export(&self) -> CalendarResult<Vec<u8>> {
        serde_json::to_vec_pretty(&self.events)
            .map_err(|e| CalendarError::Serialization(e.to_string()))
    }

    /// Replace the collection with the events in a JSON file. The top level
    /// must be an array of event records; on failure the collection is left
    /// untouched.
    pub fn import(&mut self, bytes: &[u8]) -> CalendarResult<usize> {
        match parse_all_events(bytes) {
            Ok(events) => {
                let count = events.len();
                self.replace_all(events);
                self.feedback
                    .show("✓ Events imported successfully", NoticeLevel::Success);
                Ok(count)
            }
            Err(e) => {
                let message = match &e {
                    CalendarError::Import(msg) => msg.clone(),
                    other => other.to_string(),
                };
                self.feedback
                    .show(format!("✗ Import failed: {message}"), NoticeLevel::Error);
                Err(e)
            }
        }
    }

    /// Totals per recognized category, in legend order.
    pub fn counts_by_kind(&self) -> Vec<(EventKind, usize)> {
        EventKind::ALL
            .into_iter()
            .map(|kind| {
                let count = self.events.iter().filter(|e| e.kind == kind).count();
                (kind, count)
            })
            .collect()
    }

    // THEME:

    pub fn dark_theme(&self) -> bool {
        matches!(self.storage.get(THEME_KEY), Ok(Some(v)) if v.trim() == "true")
    }

    pub fn set_dark_theme(&mut self, dark: bool) -> PersistStatus {
        let value = if dark { "true" } else { "false" };
        match self.storage.set(THEME_KEY, value) {
            Ok(()) => PersistStatus::Saved,
            Err(e) => {
                warn!("could not save theme preference: {e}");
                PersistStatus::Failed(e.to_string())
            }
        }
    }

    fn persist(&mut self) -> &PersistStatus {
        let result = serde_json::to_string(&self.events)
            .map_err(|e| CalendarError::Serialization(e.to_string()))
            .and_then(|json| self.storage.set(EVENTS_KEY, &json));

        self.last_persist = match result {
            Ok(()) => PersistStatus::Saved,
            Err(e) => {
                warn!("could not persist events, keeping them in memory: {e}");
                PersistStatus::Failed(e.to_string())
            }
        };
        &self.last_persist
    }
}

/// Parse a JSON array of events.
///
/// Fails with [`CalendarError::Import`] if the bytes are not JSON or the top
/// level is not an array. Elements that are not event-shaped are skipped.
pub fn parse_events(bytes: &[u8]) -> CalendarResult<Vec<Event>> {
    let (events, skipped) = parse_event_array(bytes)?;
    if skipped > 0 {
        warn!(skipped, "skipped records that are not events");
    }
    Ok(events)
}

/// Like [`parse_events`], but any element that is not an event fails the
/// whole parse.
fn parse_all_events(bytes: &[u8]) -> CalendarResult<Vec<Event>> {
    let (events, skipped) = parse_event_array(bytes)?;
    if skipped > 0 {
        let total = events.len() + skipped;
        return Err(CalendarError::Import(format!(
            "{skipped} of {total} entries are not events"
        )));
    }
    Ok(events)
}

/// The events in a JSON array, and how many elements were not events.
fn parse_event_array(bytes: &[u8]) -> CalendarResult<(Vec<Event>, usize)> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| CalendarError::Import(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(CalendarError::Import(
            "Invalid JSON: expected an array of events".into(),
        ));
    };

    let mut events = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Event>(item) {
            Ok(event) => events.push(event),
            Err(e) => {
                debug!("entry #{i} is not an event: {e}");
                skipped += 1;
            }
        }
    }

    Ok((events, skipped))
}

/// `evt-` followed by seven random hex digits, not in `taken`.
fn mint_id(taken: &HashSet<String>) -> String {
    loop {
        let random = Uuid::new_v4().simple().to_string();
        let id = format!("{}-{}", EVENT_ID_PREFIX, &random[..7]);
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// Give blank ids and repeated ids a fresh id. The first record carrying an
/// id keeps it.
fn normalize_ids(events: Vec<Event>) -> Vec<Event> {
    let mut taken: HashSet<String> = events.iter().map(|e| e.id.clone()).collect();
    let mut seen: HashSet<String> = HashSet::new();

    events
        .into_iter()
        .map(|mut event| {
            if event.id.trim().is_empty() || !seen.insert(event.id.clone()) {
                let id = mint_id(&taken);
                debug!(old = %event.id, new = %id, "reassigning event id");
                taken.insert(id.clone());
                seen.insert(id.clone());
                event.id = id;
            }
            event
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Recurrence;
    use crate::storage::MemoryStorage;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, title: &str, start: &str) -> Event {
        EventDraft {
            title: title.into(),
            start: start.into(),
            end: start.into(),
            ..Default::default()
        }
        .into_event(id.into())
    }

    fn store_with(events: Vec<Event>) -> EventStore<MemoryStorage> {
        let json = serde_json::to_string(&events).unwrap();
        EventStore::load(MemoryStorage::new().with_value(EVENTS_KEY, &json))
    }

    fn five_records() -> Vec<Event> {
        vec![
            record("evt-0000001", "Assembly", "2026-06-01"),
            record("evt-abc1234", "Quiz Bee", "2026-06-02"),
            record("evt-0000003", "Science Fair", "2026-06-03"),
            record("evt-0000004", "PLC", "2026-06-04"),
            record("evt-0000005", "Mass", "2026-06-05"),
        ]
    }

    fn stored_events(store: &EventStore<MemoryStorage>) -> Vec<Event> {
        let raw = store.storage().get(EVENTS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_load_without_storage_uses_seed() {
        let store = EventStore::load(MemoryStorage::new());
        assert_eq!(store.len(), 109);
        assert_eq!(*store.last_persist(), PersistStatus::NotAttempted);
    }

    #[test]
    fn test_load_corrupt_storage_uses_seed() {
        let store = EventStore::load(MemoryStorage::new().with_value(EVENTS_KEY, "{not json"));
        assert_eq!(store.len(), 109);

        let store = EventStore::load(MemoryStorage::new().with_value(EVENTS_KEY, "{}"));
        assert_eq!(store.len(), 109);
    }

    #[test]
    fn test_load_stored_events() {
        let store = store_with(five_records());
        assert_eq!(store.len(), 5);
        assert_eq!(store.events()[1].id, "evt-abc1234");

        let empty = EventStore::load(MemoryStorage::new().with_value(EVENTS_KEY, "[]"));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_stored_events_are_not_normalized() {
        let mut meeting = record("e1", "Orientation Day", "2026-06-16");
        meeting.kind = EventKind::Event;
        let store = store_with(vec![meeting]);
        assert_eq!(store.events()[0].kind, EventKind::Event);
    }

    #[test]
    fn test_add_assigns_id_and_persists() {
        let mut store = store_with(five_records());
        let added = store.add(EventDraft {
            title: "Orientation Day".into(),
            kind: EventKind::Event,
            start: "2026-06-16".into(),
            ..Default::default()
        });

        assert!(added.id.starts_with("evt-"));
        assert_eq!(added.id.len(), "evt-".len() + 7);
        assert_eq!(store.len(), 6);
        // runtime additions keep their type
        assert_eq!(store.get(&added.id).unwrap().kind, EventKind::Event);
        assert_eq!(stored_events(&store).len(), 6);
        assert_eq!(*store.last_persist(), PersistStatus::Saved);
        assert_eq!(store.feedback().current().unwrap().message, "✓ Event added");
    }

    #[test]
    fn test_add_ids_are_unique() {
        let mut store = store_with(Vec::new());
        let ids: HashSet<String> = (0..200)
            .map(|i| {
                store
                    .add(EventDraft {
                        title: format!("Event {i}"),
                        ..Default::default()
                    })
                    .id
            })
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_update_replaces_whole_record() {
        let mut store = store_with(five_records());
        let mut changed = record("evt-abc1234", "Quiz Bee Finals", "2026-06-09");
        changed.recurring = Recurrence::Annual;

        assert!(store.update(changed.clone()));
        assert_eq!(store.get("evt-abc1234"), Some(&changed));
        assert_eq!(store.events()[1], changed);
        assert_eq!(stored_events(&store)[1], changed);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = store_with(five_records());
        assert!(!store.update(record("missing", "Ghost", "2026-01-01")));
        assert_eq!(store.events(), five_records().as_slice());
    }

    #[test]
    fn test_delete_removes_then_is_idempotent() {
        let mut store = store_with(five_records());

        assert_eq!(store.delete("evt-abc1234"), 1);
        assert_eq!(store.len(), 4);
        assert!(store.get("evt-abc1234").is_none());

        assert_eq!(store.delete("evt-abc1234"), 0);
        assert_eq!(store.len(), 4);
        assert_eq!(store.feedback().current().unwrap().message, "✓ Event deleted");
    }

    #[test]
    fn test_delete_absent_id_leaves_collection_unchanged() {
        let mut store = store_with(five_records());
        store.delete("nope");
        assert_eq!(store.events(), five_records().as_slice());
    }

    #[test]
    fn test_persistence_failure_is_swallowed() {
        let mut store = EventStore::load(MemoryStorage::failing());
        let before = store.len();
        let added = store.add(EventDraft {
            title: "Recognition Day".into(),
            ..Default::default()
        });

        assert_eq!(store.len(), before + 1);
        assert!(store.get(&added.id).is_some());
        assert!(store.last_persist().is_failed());
    }

    #[test]
    fn test_replace_all_normalizes_ids() {
        let mut store = store_with(five_records());
        store.replace_all(vec![
            record("a", "One", "2026-01-01"),
            record("a", "Two", "2026-01-02"),
            record("", "Three", "2026-01-03"),
        ]);

        let ids: Vec<&str> = store.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids[0], "a");
        assert_ne!(ids[1], "a");
        assert!(!ids[2].is_empty());
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 3);
    }

    #[test]
    fn test_import_object_fails_and_keeps_collection() {
        let mut store = store_with(five_records());
        let err = store.import(b"{}").unwrap_err();

        assert!(matches!(err, CalendarError::Import(_)));
        assert_eq!(store.events(), five_records().as_slice());
        let notice = store.feedback().current().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.starts_with("✗ Import failed"));
    }

    #[test]
    fn test_import_invalid_json_fails() {
        let mut store = store_with(five_records());
        assert!(store.import(b"not json").is_err());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_import_replaces_collection() {
        let mut store = store_with(five_records());
        let bytes = br#"[
            {"id": "x1", "title": "Graduation Ball", "type": "event", "start": "2026-03-20"},
            {"id": "x2", "title": "Finals", "type": "exam", "start": "2026-03-05"}
        ]"#;

        assert_eq!(store.import(bytes).unwrap(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.events_on(ymd(2026, 3, 5))[0].kind, EventKind::Exam);
        assert_eq!(stored_events(&store).len(), 2);
    }

    #[test]
    fn test_import_with_non_event_entries_keeps_collection() {
        let mut store = store_with(vec![record("evt-0000001", "Assembly", "2026-06-01")]);
        let err = store.import(br#"[1, 2, {"title": {"x": 1}}]"#).unwrap_err();

        assert!(matches!(err, CalendarError::Import(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.events()[0].title, "Assembly");
        let notice = store.feedback().current().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "✗ Import failed: 3 of 3 entries are not events");
    }

    #[test]
    fn test_import_with_some_non_event_entries_fails() {
        let mut store = store_with(five_records());
        let bytes = br#"[
            {"id": "x1", "title": "Graduation Ball", "start": "2026-03-20"},
            42
        ]"#;

        assert!(store.import(bytes).is_err());
        assert_eq!(store.events(), five_records().as_slice());
        assert_eq!(stored_events(&store), five_records());
        assert!(store.feedback().current().unwrap().message.contains("1 of 2"));
    }

    #[test]
    fn test_load_skips_non_event_entries() {
        let raw = r#"[{"id": "x1", "title": "Finals", "start": "2026-03-05"}, 42]"#;
        let store = EventStore::load(MemoryStorage::new().with_value(EVENTS_KEY, raw));
        assert_eq!(store.len(), 1);
        assert_eq!(store.events()[0].id, "x1");
    }

    #[test]
    fn test_export_is_pretty_and_reimportable() {
        let mut store = store_with(five_records());
        let bytes = store.export().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("[\n  {"));

        store.delete("evt-0000001");
        store.import(&bytes).unwrap();
        assert_eq!(store.events(), five_records().as_slice());
    }

    #[test]
    fn test_import_then_export_keeps_unknown_fields() {
        let mut store = store_with(Vec::new());
        let bytes = br#"[{"id": "x1", "title": "Finals", "start": "2026-03-05", "createdAt": 1767225600000}]"#;
        store.import(bytes).unwrap();

        let exported: Value = serde_json::from_slice(&store.export().unwrap()).unwrap();
        assert_eq!(exported[0]["createdAt"], 1767225600000u64);
        assert_eq!(stored_events(&store)[0].extra["createdAt"], 1767225600000u64);
    }

    #[test]
    fn test_counts_by_kind() {
        let store = EventStore::load(MemoryStorage::new());
        let counts = store.counts_by_kind();
        assert_eq!(counts.len(), 5);
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, store.len());
        assert_eq!(counts[1], (EventKind::Holiday, 16));
        assert_eq!(counts[2], (EventKind::Birthday, 27));
    }

    #[test]
    fn test_theme_preference() {
        let mut store = store_with(Vec::new());
        assert!(!store.dark_theme());
        assert_eq!(store.set_dark_theme(true), PersistStatus::Saved);
        assert!(store.dark_theme());
        assert_eq!(
            store.storage().get(THEME_KEY).unwrap().as_deref(),
            Some("true")
        );
        store.set_dark_theme(false);
        assert!(!store.dark_theme());
    }
}
