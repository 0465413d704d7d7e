//! Core library for the twacal school calendar.
//!
//! This crate holds everything the client needs apart from presentation:
//! - `event`, `seed` and `store` for the event collection and its persistence
//! - `date` and `grid` for month layout and day matching
//! - `remote`, `backend` and `sync` for reconciling with remote sources
//! - `app` for the controller that ties these together behind the admin gate

pub mod app;
pub mod auth;
pub mod backend;
pub mod config;
pub mod constants;
pub mod date;
pub mod error;
pub mod event;
pub mod feedback;
pub mod grid;
pub mod remote;
pub mod seed;
pub mod storage;
pub mod store;
pub mod sync;

pub use app::CalendarApp;
pub use config::CalendarConfig;
pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventDraft, EventKind, Recurrence};
pub use store::{EventStore, PersistStatus};
