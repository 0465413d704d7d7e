//! Application state.
//!
//! `CalendarApp` owns the event store, the admin session and the displayed
//! month. Mutating operations check the admin gate first; reads are open to
//! everyone.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::auth::AdminGate;
use crate::backend::DocumentStore;
use crate::date::{add_months, start_of_month};
use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventDraft, EventKind};
use crate::feedback::{Notice, NoticeLevel, TODAY_NOTICE_TTL, todays_events_message};
use crate::grid::MonthGrid;
use crate::remote::FeedOutcome;
use crate::storage::Storage;
use crate::store::{EventStore, PersistStatus};
use crate::sync;

pub struct CalendarApp<S: Storage> {
    store: EventStore<S>,
    gate: AdminGate,
    today: NaiveDate,
    current_month: NaiveDate,
    selected_date: Option<NaiveDate>,
}

impl<S: Storage> CalendarApp<S> {
    pub fn new(store: EventStore<S>, admin_password: impl Into<String>, today: NaiveDate) -> Self {
        CalendarApp {
            store,
            gate: AdminGate::new(admin_password),
            today,
            current_month: start_of_month(today),
            selected_date: None,
        }
    }

    pub fn store(&self) -> &EventStore<S> {
        &self.store
    }

    pub fn events(&self) -> &[Event] {
        self.store.events()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    // SESSION:

    pub fn is_admin(&self) -> bool {
        self.gate.is_admin()
    }

    pub fn login(&mut self, password: &str) -> CalendarResult<()> {
        match self.gate.login(password) {
            Ok(()) => {
                self.notify("✓ Logged in as Admin", NoticeLevel::Success);
                Ok(())
            }
            Err(e) => {
                self.notify("✗ Wrong password", NoticeLevel::Error);
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        self.gate.logout();
    }

    // NAVIGATION:

    pub fn current_month(&self) -> NaiveDate {
        self.current_month
    }

    pub fn go_to_month(&mut self, month: NaiveDate) {
        self.current_month = start_of_month(month);
    }

    pub fn next_month(&mut self) {
        self.current_month = add_months(self.current_month, 1);
    }

    pub fn prev_month(&mut self) {
        self.current_month = add_months(self.current_month, -1);
    }

    pub fn go_to_today(&mut self) {
        self.current_month = start_of_month(self.today);
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
    }

    /// Grid for the displayed month.
    pub fn grid(&self) -> MonthGrid {
        MonthGrid::new(self.current_month)
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.store.events_on(date)
    }

    /// Events on the selected date, or on today when nothing is selected.
    pub fn selected_events(&self) -> Vec<&Event> {
        self.events_on(self.selected_date.unwrap_or(self.today))
    }

    /// Raise the long-lived "today's events" notice. Returns false when
    /// nothing happens today.
    pub fn show_todays_events(&mut self) -> bool {
        let message = todays_events_message(&self.store.events_on(self.today));
        match message {
            Some(message) => {
                self.store
                    .feedback_mut()
                    .show_for(message, NoticeLevel::Info, TODAY_NOTICE_TTL);
                true
            }
            None => false,
        }
    }

    pub fn counts_by_kind(&self) -> Vec<(EventKind, usize)> {
        self.store.counts_by_kind()
    }

    // ADMIN:

    /// Add a new event (`id` is `None`) or replace an existing one. Editing
    /// an id that is not in the collection fails and changes nothing.
    pub fn save_event(&mut self, id: Option<&str>, draft: EventDraft) -> CalendarResult<Event> {
        self.gate.require_admin()?;
        if draft.title.trim().is_empty() {
            return Err(CalendarError::InvalidEvent("Please enter a title".into()));
        }

        match id {
            Some(id) => {
                let Some(existing) = self.store.get(id) else {
                    return Err(CalendarError::EventNotFound(id.to_string()));
                };
                let mut event = draft.into_event(id.to_string());
                event.extra = existing.extra.clone();
                self.store.update(event.clone());
                Ok(event)
            }
            None => Ok(self.store.add(draft)),
        }
    }

    pub fn delete_event(&mut self, id: &str) -> CalendarResult<usize> {
        self.gate.require_admin()?;
        Ok(self.store.delete(id))
    }

    pub fn import(&mut self, bytes: &[u8]) -> CalendarResult<usize> {
        self.gate.require_admin()?;
        self.store.import(bytes)
    }

    pub fn export(&self) -> CalendarResult<Vec<u8>> {
        self.gate.require_admin()?;
        self.store.export()
    }

    /// Save locally, then mirror the new event to the backend.
    pub async fn add_event_synced<B: DocumentStore>(
        &mut self,
        backend: &B,
        draft: EventDraft,
    ) -> CalendarResult<Event> {
        let event = self.save_event(None, draft)?;
        let result = backend.add_document(&event).await.map(|remote_id| {
            debug!(local = %event.id, remote = %remote_id, "event mirrored to backend");
        });
        self.report_backend_write(result);
        Ok(event)
    }

    /// Delete locally, then from the backend.
    pub async fn delete_event_synced<B: DocumentStore>(
        &mut self,
        backend: &B,
        id: &str,
    ) -> CalendarResult<usize> {
        let removed = self.delete_event(id)?;
        let result = backend.delete_document(id).await;
        self.report_backend_write(result);
        Ok(removed)
    }

    fn report_backend_write(&mut self, result: CalendarResult<()>) {
        match result {
            Ok(()) | Err(CalendarError::BackendNotEnabled) => {}
            Err(e) => {
                warn!("backend write failed: {e}");
                self.notify(format!("⚠ Backend not updated: {e}"), NoticeLevel::Warning);
            }
        }
    }

    // SYNC:

    pub fn apply_feed(&mut self, outcome: FeedOutcome) -> bool {
        sync::apply_feed(&mut self.store, outcome)
    }

    pub fn apply_snapshot(&mut self, snapshot: Vec<Event>) {
        sync::apply_snapshot(&mut self.store, snapshot);
    }

    /// Mutable access for the sync loops.
    pub fn store_mut(&mut self) -> &mut EventStore<S> {
        &mut self.store
    }

    // PREFERENCES:

    pub fn dark_theme(&self) -> bool {
        self.store.dark_theme()
    }

    pub fn set_dark_theme(&mut self, dark: bool) -> PersistStatus {
        self.store.set_dark_theme(dark)
    }

    pub fn last_persist(&self) -> &PersistStatus {
        self.store.last_persist()
    }

    /// Notices emitted since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.store.feedback_mut().take_pending()
    }

    fn notify(&mut self, message: impl Into<String>, level: NoticeLevel) {
        self.store.feedback_mut().show(message, level);
    }
}
