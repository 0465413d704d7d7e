//! Admin gate: a shared secret compared in plain text.
//!
//! The session lives in memory only. There is no lockout and no expiry.

use tracing::info;

use crate::error::{CalendarError, CalendarResult};

#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: String,
    logged_in: bool,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        AdminGate {
            secret: secret.into(),
            logged_in: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.logged_in
    }

    pub fn login(&mut self, input: &str) -> CalendarResult<()> {
        if input == self.secret {
            self.logged_in = true;
            info!("admin logged in");
            Ok(())
        } else {
            Err(CalendarError::AuthFailed)
        }
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
    }

    pub fn require_admin(&self) -> CalendarResult<()> {
        if self.logged_in {
            Ok(())
        } else {
            Err(CalendarError::NotAdmin)
        }
    }
}
