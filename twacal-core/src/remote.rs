//! The read-only remote feed: a JSON array of events at a fixed URL.
//!
//! Fetch failures never surface as errors. They come back as
//! [`FeedOutcome::Unchanged`] with the reason, and local data stays as is.

use std::fmt;
use std::future::Future;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::debug;

use crate::error::CalendarError;
use crate::event::Event;
use crate::store::parse_events;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// A non-empty, well-formed collection to replace local data with
    Updated(Vec<Event>),
    Unchanged(UnchangedReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnchangedReason {
    Network(String),
    Status(u16),
    Malformed(String),
    Empty,
}

impl fmt::Display for UnchangedReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnchangedReason::Network(e) => write!(f, "network error: {e}"),
            UnchangedReason::Status(code) => write!(f, "HTTP {code}"),
            UnchangedReason::Malformed(e) => write!(f, "malformed feed: {e}"),
            UnchangedReason::Empty => write!(f, "feed is empty"),
        }
    }
}

/// Anything that can produce a feed outcome.
pub trait FeedSource {
    fn fetch(&self) -> impl Future<Output = FeedOutcome> + Send;
}

#[derive(Clone)]
pub struct RemoteFeed {
    client: reqwest::Client,
    url: String,
}

impl RemoteFeed {
    pub fn new(url: impl Into<String>) -> Self {
        RemoteFeed {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FeedSource for RemoteFeed {
    async fn fetch(&self) -> FeedOutcome {
        debug!(url = %self.url, "fetching remote feed");

        let response = match self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return FeedOutcome::Unchanged(UnchangedReason::Network(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            return FeedOutcome::Unchanged(UnchangedReason::Status(status.as_u16()));
        }

        match response.bytes().await {
            Ok(body) => interpret_body(&body),
            Err(e) => FeedOutcome::Unchanged(UnchangedReason::Network(e.to_string())),
        }
    }
}

/// Decide what a successful response body means for local data.
pub fn interpret_body(body: &[u8]) -> FeedOutcome {
    match parse_events(body) {
        Ok(events) if events.is_empty() => FeedOutcome::Unchanged(UnchangedReason::Empty),
        Ok(events) => FeedOutcome::Updated(events),
        Err(CalendarError::Import(msg)) => FeedOutcome::Unchanged(UnchangedReason::Malformed(msg)),
        Err(e) => FeedOutcome::Unchanged(UnchangedReason::Malformed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_body_updates() {
        let body = br#"[{"id": "r1", "title": "Intramurals", "type": "event", "start": "2025-07-16"}]"#;
        match interpret_body(body) {
            FeedOutcome::Updated(events) => {
                assert_eq!(events.len(), 1);
                assert_eq!(events[0].id, "r1");
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_array_is_no_update() {
        assert_eq!(
            interpret_body(b"[]"),
            FeedOutcome::Unchanged(UnchangedReason::Empty)
        );
    }

    #[test]
    fn test_non_array_and_garbage_are_no_update() {
        assert!(matches!(
            interpret_body(br#"{"events": []}"#),
            FeedOutcome::Unchanged(UnchangedReason::Malformed(_))
        ));
        assert!(matches!(
            interpret_body(b"<html>404</html>"),
            FeedOutcome::Unchanged(UnchangedReason::Malformed(_))
        ));
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(UnchangedReason::Status(404).to_string(), "HTTP 404");
        assert_eq!(UnchangedReason::Empty.to_string(), "feed is empty");
    }
}
