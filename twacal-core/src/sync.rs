//! Reconciling remote state into the local store.
//!
//! Remote data always wins by wholesale replacement; there is no field-level
//! merge. The startup fetch is a one-shot that can be abandoned, the live
//! subscription replaces the collection on every snapshot until stopped.

use std::future::Future;

use tracing::{debug, info};

use crate::backend::Subscription;
use crate::event::Event;
use crate::feedback::NoticeLevel;
use crate::remote::{FeedOutcome, FeedSource};
use crate::storage::Storage;
use crate::store::EventStore;

/// What the startup fetch ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum StartupSync {
    Replaced(usize),
    Unchanged(String),
    Cancelled,
}

/// Replace the collection if the feed produced events. Returns true when
/// local data was replaced.
pub fn apply_feed<S: Storage>(store: &mut EventStore<S>, outcome: FeedOutcome) -> bool {
    match outcome {
        FeedOutcome::Updated(events) => {
            info!(count = events.len(), "calendar updated from remote feed");
            store.replace_all(events);
            store
                .feedback_mut()
                .show("✓ Calendar updated from remote", NoticeLevel::Success);
            true
        }
        FeedOutcome::Unchanged(reason) => {
            debug!(%reason, "remote feed brought no update");
            false
        }
    }
}

/// Fetch the feed once and apply it, unless `cancel` resolves first, in
/// which case the response is discarded.
pub async fn startup_sync<S, F, C>(store: &mut EventStore<S>, feed: &F, cancel: C) -> StartupSync
where
    S: Storage,
    F: FeedSource,
    C: Future<Output = ()>,
{
    let outcome = tokio::select! {
        outcome = feed.fetch() => outcome,
        _ = cancel => {
            debug!("startup fetch abandoned");
            return StartupSync::Cancelled;
        }
    };

    match outcome {
        FeedOutcome::Updated(events) => {
            let count = events.len();
            apply_feed(store, FeedOutcome::Updated(events));
            StartupSync::Replaced(count)
        }
        FeedOutcome::Unchanged(reason) => {
            debug!(%reason, "remote feed brought no update");
            StartupSync::Unchanged(reason.to_string())
        }
    }
}

/// Make a backend snapshot the local collection.
pub fn apply_snapshot<S: Storage>(store: &mut EventStore<S>, snapshot: Vec<Event>) {
    debug!(count = snapshot.len(), "applying backend snapshot");
    store.replace_all(snapshot);
}

/// Apply snapshots as they arrive until `stop` resolves or the subscription
/// ends. `on_applied` runs after each replacement. Returns how many
/// snapshots were applied.
pub async fn follow_subscription<S, C, F>(
    store: &mut EventStore<S>,
    subscription: &mut Subscription,
    stop: C,
    mut on_applied: F,
) -> usize
where
    S: Storage,
    C: Future<Output = ()>,
    F: FnMut(&EventStore<S>),
{
    tokio::pin!(stop);
    let mut applied = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            snapshot = subscription.next_snapshot() => match snapshot {
                Some(events) => {
                    apply_snapshot(store, events);
                    applied += 1;
                    on_applied(store);
                }
                None => break,
            },
        }
    }

    applied
}
