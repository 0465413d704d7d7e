//! Transient status messages emitted by store mutations and sync.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::event::Event;

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);
pub const TODAY_NOTICE_TTL: Duration = Duration::from_secs(15);

/// Titles listed before the "+N more" suffix
const TODAY_NOTICE_TITLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

/// The notification slot. A new notice replaces the one on screen; every
/// notice is also queued until the caller takes it.
#[derive(Debug, Default)]
pub struct Feedback {
    current: Option<Notice>,
    pending: Vec<Notice>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>, level: NoticeLevel) {
        self.show_for(message, level, DEFAULT_NOTICE_TTL);
    }

    pub fn show_for(&mut self, message: impl Into<String>, level: NoticeLevel, ttl: Duration) {
        let message = message.into();
        match level {
            NoticeLevel::Error | NoticeLevel::Warning => warn!(%message, "notice"),
            NoticeLevel::Success | NoticeLevel::Info => info!(%message, "notice"),
        }

        let notice = Notice {
            message,
            level,
            shown_at: Instant::now(),
            ttl,
        };
        self.pending.push(notice.clone());
        self.current = Some(notice);
    }

    /// The notice on screen at `now`, if it has not expired.
    pub fn current_at(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|n| !n.is_expired(now))
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current_at(Instant::now())
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Notices emitted since the last call, oldest first.
    pub fn take_pending(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

/// "📅 Today's events: a, b, c... +2 more", or `None` when there are none.
pub fn todays_events_message(todays: &[&Event]) -> Option<String> {
    if todays.is_empty() {
        return None;
    }

    let mut list = todays
        .iter()
        .take(TODAY_NOTICE_TITLES)
        .map(|e| e.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if todays.len() > TODAY_NOTICE_TITLES {
        list.push_str(&format!("... +{} more", todays.len() - TODAY_NOTICE_TITLES));
    }

    Some(format!("📅 Today's events: {list}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDraft;

    fn titled(title: &str) -> Event {
        EventDraft {
            title: title.into(),
            ..Default::default()
        }
        .into_event(title.into())
    }

    #[test]
    fn test_new_notice_replaces_current() {
        let mut feedback = Feedback::new();
        feedback.show("✓ Event added", NoticeLevel::Success);
        feedback.show("✗ Wrong password", NoticeLevel::Error);

        let current = feedback.current().unwrap();
        assert_eq!(current.message, "✗ Wrong password");
        assert_eq!(current.level, NoticeLevel::Error);

        let pending = feedback.take_pending();
        assert_eq!(pending.len(), 2);
        assert!(feedback.take_pending().is_empty());
    }

    #[test]
    fn test_notice_expires() {
        let mut feedback = Feedback::new();
        feedback.show("✓ Event deleted", NoticeLevel::Success);
        let shown_at = feedback.current().unwrap().shown_at;

        assert!(feedback.current_at(shown_at + Duration::from_secs(4)).is_some());
        assert!(feedback.current_at(shown_at + DEFAULT_NOTICE_TTL).is_none());
    }

    #[test]
    fn test_todays_events_message() {
        assert_eq!(todays_events_message(&[]), None);

        let a = titled("Assembly");
        let b = titled("Quiz");
        assert_eq!(
            todays_events_message(&[&a, &b]).unwrap(),
            "📅 Today's events: Assembly, Quiz"
        );

        let (c, d, e) = (titled("Fair"), titled("PLC"), titled("Mass"));
        assert_eq!(
            todays_events_message(&[&a, &b, &c, &d, &e]).unwrap(),
            "📅 Today's events: Assembly, Quiz, Fair... +2 more"
        );
    }
}
