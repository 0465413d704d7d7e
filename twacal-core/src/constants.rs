/// Storage key holding the JSON-serialized event collection
pub const EVENTS_KEY: &str = "dec_events_v2";

/// Storage key holding the dark theme preference ("true" / "false")
pub const THEME_KEY: &str = "dec_theme_dark";

/// Read-only feed checked once at startup
pub const DEFAULT_REMOTE_URL: &str = "https://ching0ching.github.io/TWA/events.json";

pub const DEFAULT_ADMIN_PASSWORD: &str = "ros123";

pub const DEFAULT_TIMEZONE: &str = "Asia/Manila";

/// Seconds between polls of the hosted document backend
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Backend collection that holds the event documents
pub const BACKEND_COLLECTION: &str = "events";

/// Prefix of ids minted for new events
pub const EVENT_ID_PREFIX: &str = "evt";
