//! Storage keys and flag values shared with the rest of the site.

/// Durable key holding the JSON-encoded signed-in [`crate::User`].
pub const CURRENT_USER: &str = "currentUser";

/// Login flag, present in both the durable and the session store.
pub const IS_LOGGED_IN: &str = "isLoggedIn";

/// Session key for the dark-mode preference.
pub const DARK_MODE: &str = "darkMode";

/// Prefix of the per-user cart key.
pub const CART_PREFIX: &str = "cart_";

pub const FLAG_TRUE: &str = "true";
pub const FLAG_FALSE: &str = "false";

/// Durable key under which the cart of `email` is stored.
#[must_use]
pub fn cart_key(email: &str) -> String {
    format!("{CART_PREFIX}{email}")
}

/// Whether a stored flag value means "on". Only the exact string `true` does.
#[must_use]
pub fn flag_is_set(value: Option<&str>) -> bool {
    value == Some(FLAG_TRUE)
}
