//! Two memory stores standing in for a browser's storage areas.
use chrono::{DateTime, TimeZone, Utc};
use shopshell_core::keys::{CURRENT_USER, IS_LOGGED_IN};
use shopshell_core::{KeyValueStore, MemoryStore, Session, User};

pub type MemorySession = Session<MemoryStore, MemoryStore>;

#[derive(Debug, Clone, Default)]
pub struct Harness {
    pub durable: MemoryStore,
    pub session: MemoryStore,
}

impl Harness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What the login page leaves behind for `user`.
    ///
    /// # Errors
    /// Returns an error if the user cannot be serialized or stored.
    pub fn sign_in(&self, user: &User) -> anyhow::Result<()> {
        self.durable
            .set(CURRENT_USER, &serde_json::to_string(user)?)?;
        self.durable.set(IS_LOGGED_IN, "true")?;
        self.session.set(IS_LOGGED_IN, "true")?;
        Ok(())
    }

    /// A page controller over the shared stores; call twice for two tabs.
    #[must_use]
    pub fn tab(&self) -> MemorySession {
        Session::new(self.durable.clone(), self.session.clone())
    }

    /// Fixed clock so reports are reproducible.
    #[must_use]
    pub fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}
