//! The calendar event record.
//!
//! Records arrive from admin input, imported files, the remote feed and the
//! hosted backend, so deserialization is forgiving: missing text fields
//! default to empty, numeric ids become strings, and unknown categories or
//! recurrence values are kept instead of rejected.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::date::{is_same_day, is_same_month_day, parse_event_date};

/// A calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    /// `YYYY-MM-DD`, timestamps tolerated
    #[serde(default, deserialize_with = "lenient_string")]
    pub start: String,
    /// May be blank or equal to `start`
    #[serde(default, deserialize_with = "lenient_string")]
    pub end: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default)]
    pub recurring: Recurrence,
    /// Fields this client does not interpret, such as `createdAt`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Parsed start date, `None` if `start` is not a recognizable date.
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_event_date(&self.start)
    }

    pub fn is_annual(&self) -> bool {
        self.recurring == Recurrence::Annual
    }

    /// Whether this event shows up on `date`.
    ///
    /// A dated match and an annual month/day match are independent; records
    /// with an unparseable start never match.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        let Some(start) = self.start_date() else {
            return false;
        };
        is_same_day(&start, &date) || (self.is_annual() && is_same_month_day(&start, &date))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// The fields an admin fills in. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub kind: EventKind,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
    pub recurring: Recurrence,
}

impl EventDraft {
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            title: self.title,
            kind: self.kind,
            start: self.start,
            end: self.end,
            location: self.location,
            description: self.description,
            recurring: self.recurring,
            extra: Map::new(),
        }
    }
}

impl From<Event> for EventDraft {
    fn from(event: Event) -> Self {
        EventDraft {
            title: event.title,
            kind: event.kind,
            start: event.start,
            end: event.end,
            location: event.location,
            description: event.description,
            recurring: event.recurring,
        }
    }
}

/// Event category. Unknown values from imported data are kept as `Other`
/// and displayed with the `Event` style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum EventKind {
    #[default]
    Event,
    Holiday,
    Birthday,
    Exam,
    Meeting,
    Other(String),
}

impl EventKind {
    /// The recognized categories, in legend order.
    pub const ALL: [EventKind; 5] = [
        EventKind::Event,
        EventKind::Holiday,
        EventKind::Birthday,
        EventKind::Exam,
        EventKind::Meeting,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Event => "event",
            EventKind::Holiday => "holiday",
            EventKind::Birthday => "birthday",
            EventKind::Exam => "exam",
            EventKind::Meeting => "meeting",
            EventKind::Other(s) => s,
        }
    }

    /// Capitalized name for legends and stats.
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventKind::Other(_))
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        match s.trim() {
            "event" => EventKind::Event,
            "holiday" => EventKind::Holiday,
            "birthday" => EventKind::Birthday,
            "exam" => EventKind::Exam,
            "meeting" => EventKind::Meeting,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl From<Option<String>> for EventKind {
    fn from(s: Option<String>) -> Self {
        match s {
            Some(s) => EventKind::from(s.as_str()),
            None => EventKind::default(),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence rule. Only annual repetition exists; `Unset` is the empty
/// string some records carry, and it behaves like `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Recurrence {
    None,
    Annual,
    #[default]
    Unset,
}

impl From<Option<String>> for Recurrence {
    fn from(s: Option<String>) -> Self {
        match s.as_deref().map(str::trim) {
            Some("none") => Recurrence::None,
            Some("annual") => Recurrence::Annual,
            _ => Recurrence::Unset,
        }
    }
}

impl From<Recurrence> for String {
    fn from(r: Recurrence) -> Self {
        match r {
            Recurrence::None => "none",
            Recurrence::Annual => "annual",
            Recurrence::Unset => "",
        }
        .to_string()
    }
}

/// Accept strings, numbers, booleans and null for a text field.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(start: &str, recurring: Recurrence) -> Event {
        EventDraft {
            title: "Foundation Day".into(),
            start: start.into(),
            recurring,
            ..Default::default()
        }
        .into_event("evt-1".into())
    }

    #[test]
    fn test_deserialize_full_record() {
        let value = json!({
            "id": "holiday-001",
            "title": "New Year's Day",
            "type": "holiday",
            "start": "2026-01-01",
            "end": "2026-01-01",
            "location": "",
            "description": "National holiday",
            "recurring": "annual"
        });
        let event: Event = serde_json::from_value(value).unwrap();
        assert_eq!(event.kind, EventKind::Holiday);
        assert_eq!(event.recurring, Recurrence::Annual);
        assert_eq!(event.start_date(), Some(ymd(2026, 1, 1)));
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let value = json!({ "id": 42, "title": "Assembly", "start": "2026-06-01", "location": null });
        let event: Event = serde_json::from_value(value).unwrap();
        assert_eq!(event.id, "42");
        assert_eq!(event.kind, EventKind::Event);
        assert_eq!(event.end, "");
        assert_eq!(event.location, "");
        assert_eq!(event.recurring, Recurrence::Unset);
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let value = json!({ "id": "x", "title": "Fair", "type": "festival", "start": "2026-06-01" });
        let event: Event = serde_json::from_value(value).unwrap();
        assert_eq!(event.kind, EventKind::Other("festival".into()));
        assert!(!event.kind.is_recognized());

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["type"], "festival");
    }

    #[test]
    fn test_recurrence_serializes_as_plain_strings() {
        let mut e = event("2026-01-01", Recurrence::Unset);
        assert_eq!(serde_json::to_value(&e).unwrap()["recurring"], "");
        e.recurring = Recurrence::None;
        assert_eq!(serde_json::to_value(&e).unwrap()["recurring"], "none");
        e.recurring = Recurrence::Annual;
        assert_eq!(serde_json::to_value(&e).unwrap()["recurring"], "annual");
    }

    #[test]
    fn test_object_in_text_field_is_rejected() {
        let value = json!({ "id": "x", "title": { "nested": true } });
        assert!(serde_json::from_value::<Event>(value).is_err());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let value = json!({
            "id": "x",
            "title": "Fair",
            "start": "2026-06-01",
            "createdAt": "2026-05-01T08:00:00Z",
            "rsvp": { "count": 3 }
        });
        let event: Event = serde_json::from_value(value).unwrap();
        assert_eq!(event.extra.len(), 2);
        assert!(!event.extra.contains_key("title"));

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["createdAt"], "2026-05-01T08:00:00Z");
        assert_eq!(back["rsvp"]["count"], 3);
        assert_eq!(back["title"], "Fair");
    }

    #[test]
    fn test_occurs_on_exact_day() {
        let e = event("2026-03-10", Recurrence::None);
        assert!(e.occurs_on(ymd(2026, 3, 10)));
        assert!(!e.occurs_on(ymd(2027, 3, 10)));
    }

    #[test]
    fn test_annual_occurs_every_year() {
        let e = event("2020-03-10", Recurrence::Annual);
        for year in 1990..2060 {
            assert!(e.occurs_on(ymd(year, 3, 10)));
            assert!(!e.occurs_on(ymd(year, 3, 11)));
        }
    }

    #[test]
    fn test_unparseable_start_never_matches() {
        let e = event("someday", Recurrence::Annual);
        assert!(!e.occurs_on(ymd(2026, 3, 10)));
    }

    #[test]
    fn test_kind_label() {
        assert_eq!(EventKind::Birthday.label(), "Birthday");
        assert_eq!(EventKind::Other("field trip".into()).label(), "Field trip");
    }
}
