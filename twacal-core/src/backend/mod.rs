//! Hosted document backend.
//!
//! The backend is a black-box store of event documents. It can push the full
//! current set on every change, add a document (returning the id it
//! generated) and delete one by id. Without connection parameters every
//! operation fails fast with [`CalendarError::BackendNotEnabled`].

mod firestore;
mod memory;

pub use firestore::FirestoreBackend;
pub use memory::MemoryBackend;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{CalendarError, CalendarResult};
use crate::event::Event;

/// Connection parameters. They come as a group: the backend is enabled only
/// when at least the api key and project id are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl BackendConfig {
    pub fn is_enabled(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.api_key) && present(&self.project_id)
    }
}

/// Full snapshots of the remote collection, ordered by start ascending.
///
/// Dropping the subscription (or calling [`Subscription::unsubscribe`])
/// stops the producer; no further snapshots are delivered.
pub struct Subscription {
    rx: mpsc::Receiver<Vec<Event>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(rx: mpsc::Receiver<Vec<Event>>, task: JoinHandle<()>) -> Self {
        Subscription {
            rx,
            task: Some(task),
        }
    }

    /// Wait for the next snapshot. `None` once the backend side is gone.
    pub async fn next_snapshot(&mut self) -> Option<Vec<Event>> {
        self.rx.recv().await
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Capacity of the snapshot channel between producer and subscriber
const SNAPSHOT_BUFFER: usize = 16;

pub(crate) fn snapshot_channel() -> (mpsc::Sender<Vec<Event>>, mpsc::Receiver<Vec<Event>>) {
    mpsc::channel(SNAPSHOT_BUFFER)
}

/// Order a snapshot the way the backend query does.
pub(crate) fn sort_by_start(events: &mut [Event]) {
    events.sort_by(|a, b| a.start.cmp(&b.start));
}

pub trait DocumentStore {
    fn subscribe(&self) -> impl Future<Output = CalendarResult<Subscription>> + Send;

    /// Store a new document. Any id on `event` is ignored; the backend
    /// generates one and returns it.
    fn add_document(&self, event: &Event) -> impl Future<Output = CalendarResult<String>> + Send;

    fn delete_document(&self, id: &str) -> impl Future<Output = CalendarResult<()>> + Send;
}

/// The configured backend, or `Disabled`.
#[derive(Clone)]
pub enum Backend {
    Disabled,
    Firestore(FirestoreBackend),
    Memory(MemoryBackend),
}

impl Backend {
    pub fn from_config(config: &BackendConfig, poll_interval: Duration) -> CalendarResult<Self> {
        if !config.is_enabled() {
            return Ok(Backend::Disabled);
        }
        Ok(Backend::Firestore(FirestoreBackend::new(config, poll_interval)?))
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Backend::Disabled)
    }
}

impl DocumentStore for Backend {
    async fn subscribe(&self) -> CalendarResult<Subscription> {
        match self {
            Backend::Disabled => Err(CalendarError::BackendNotEnabled),
            Backend::Firestore(b) => b.subscribe().await,
            Backend::Memory(b) => b.subscribe().await,
        }
    }

    async fn add_document(&self, event: &Event) -> CalendarResult<String> {
        match self {
            Backend::Disabled => Err(CalendarError::BackendNotEnabled),
            Backend::Firestore(b) => b.add_document(event).await,
            Backend::Memory(b) => b.add_document(event).await,
        }
    }

    async fn delete_document(&self, id: &str) -> CalendarResult<()> {
        match self {
            Backend::Disabled => Err(CalendarError::BackendNotEnabled),
            Backend::Firestore(b) => b.delete_document(id).await,
            Backend::Memory(b) => b.delete_document(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDraft;

    fn config(api_key: Option<&str>, project_id: Option<&str>) -> BackendConfig {
        BackendConfig {
            api_key: api_key.map(String::from),
            project_id: project_id.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_enabled_needs_key_and_project() {
        assert!(!BackendConfig::default().is_enabled());
        assert!(!config(Some("key"), None).is_enabled());
        assert!(!config(None, Some("school-cal")).is_enabled());
        assert!(!config(Some(""), Some("school-cal")).is_enabled());
        assert!(config(Some("key"), Some("school-cal")).is_enabled());
    }

    #[test]
    fn test_from_config() {
        let poll = Duration::from_secs(10);
        let disabled = Backend::from_config(&BackendConfig::default(), poll).unwrap();
        assert!(!disabled.is_enabled());

        let enabled = Backend::from_config(&config(Some("key"), Some("school-cal")), poll).unwrap();
        assert!(matches!(enabled, Backend::Firestore(_)));
    }

    #[tokio::test]
    async fn test_disabled_backend_fails_fast() {
        let backend = Backend::Disabled;
        let event = EventDraft::default().into_event("x".into());

        assert!(matches!(
            backend.subscribe().await,
            Err(CalendarError::BackendNotEnabled)
        ));
        assert!(matches!(
            backend.add_document(&event).await,
            Err(CalendarError::BackendNotEnabled)
        ));
        assert!(matches!(
            backend.delete_document("x").await,
            Err(CalendarError::BackendNotEnabled)
        ));
    }
}
