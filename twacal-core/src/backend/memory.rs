//! In-process document store that pushes a snapshot on every change.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use super::{DocumentStore, Subscription, snapshot_channel, sort_by_start};
use crate::error::CalendarResult;
use crate::event::Event;

#[derive(Clone)]
pub struct MemoryBackend {
    documents: Arc<watch::Sender<Vec<Event>>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        MemoryBackend {
            documents: Arc::new(tx),
        }
    }

    /// Current documents, ordered by start.
    pub fn documents(&self) -> Vec<Event> {
        self.documents.borrow().clone()
    }
}

impl DocumentStore for MemoryBackend {
    async fn subscribe(&self) -> CalendarResult<Subscription> {
        let mut changes = self.documents.subscribe();
        let (tx, rx) = snapshot_channel();

        let task = tokio::spawn(async move {
            loop {
                let snapshot = changes.borrow_and_update().clone();
                if tx.send(snapshot).await.is_err() {
                    break;
                }
                if changes.changed().await.is_err() {
                    break;
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }

    async fn add_document(&self, event: &Event) -> CalendarResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        let mut doc = event.clone();
        doc.id = id.clone();
        debug!(%id, "memory backend: add");

        self.documents.send_modify(|docs| {
            docs.push(doc);
            sort_by_start(docs);
        });
        Ok(id)
    }

    async fn delete_document(&self, id: &str) -> CalendarResult<()> {
        debug!(%id, "memory backend: delete");
        self.documents.send_modify(|docs| docs.retain(|d| d.id != id));
        Ok(())
    }
}
