//! The signed-in user record written by the login page.
use serde::{Deserialize, Serialize};

/// Label shown on the account link when no better name is known.
pub const ACCOUNT_LABEL: &str = "Account";

/// User record as stored under [`crate::keys::CURRENT_USER`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity key; also used to derive the cart key.
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_names(mut self, first: Option<&str>, last: Option<&str>) -> Self {
        self.first_name = first.map(str::to_string);
        self.last_name = last.map(str::to_string);
        self
    }

    /// Parse a stored user record. Missing, `null` or malformed JSON yields `None`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|json| serde_json::from_str::<Option<Self>>(json).ok())
            .flatten()
    }

    /// Name for the account link: first name, then last name (both trimmed),
    /// then the email, then the generic label.
    #[must_use]
    pub fn display_name(&self) -> String {
        let trimmed = |name: &Option<String>| {
            name.as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        };
        trimmed(&self.first_name)
            .or_else(|| trimmed(&self.last_name))
            .or_else(|| Some(self.email.clone()).filter(|e| !e.is_empty()))
            .unwrap_or_else(|| ACCOUNT_LABEL.to_string())
    }
}
