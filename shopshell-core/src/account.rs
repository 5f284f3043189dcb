//! What the account link and dropdown should show.
use crate::user::{ACCOUNT_LABEL, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountView {
    /// Link shows `display_name`, toggles the dropdown and logout is live.
    SignedIn { display_name: String },
    /// Link reads "Account" and leads to the login page; dropdown hidden.
    SignedOut,
}

impl AccountView {
    /// Both a user record and a login flag are required to count as signed in.
    #[must_use]
    pub fn resolve(user: Option<&User>, logged_in: bool) -> Self {
        match user {
            Some(user) if logged_in => Self::SignedIn {
                display_name: user.display_name(),
            },
            _ => Self::SignedOut,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::SignedIn { display_name } => display_name,
            Self::SignedOut => ACCOUNT_LABEL,
        }
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }
}
