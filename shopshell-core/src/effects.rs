//! Side effects requested by session operations.
//!
//! Operations never touch the page themselves. They return a [`Reaction`]
//! which the shell applies in order: badge first, then a full refresh if
//! asked for, then each [`Effect`].

/// Pages the shell can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Login,
    Home,
    Cart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Blocking message dialog.
    Alert(String),
    /// Leave the current page.
    Navigate(Destination),
}

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login first!";
pub const LOGGED_OUT_MESSAGE: &str = "You have logged out.";

#[must_use]
pub fn added_message(product_name: &str) -> String {
    format!("{product_name} added to cart!")
}

/// Result of a session operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Count to write into the badge, when the operation knows it.
    pub badge: Option<u32>,
    /// Re-render badge and account area from storage before the effects run.
    pub refresh: bool,
    pub effects: Vec<Effect>,
}

impl Reaction {
    /// Alert and send the visitor to the login page.
    #[must_use]
    pub fn login_required() -> Self {
        Self {
            effects: vec![
                Effect::Alert(LOGIN_REQUIRED_MESSAGE.to_string()),
                Effect::Navigate(Destination::Login),
            ],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn navigates_to(&self, destination: Destination) -> bool {
        self.effects.contains(&Effect::Navigate(destination))
    }
}
