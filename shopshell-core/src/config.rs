//! Navigation targets and messages used by the shell.
use std::borrow::Cow;

use crate::effects::Destination;

/// Static configuration of the page shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub login_page: Cow<'static, str>,
    pub home_page: Cow<'static, str>,
    pub cart_page: Cow<'static, str>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::SITE
    }
}

impl ShellConfig {
    /// Pages of the shop site, relative to the current page.
    pub const SITE: Self = Self {
        login_page: Cow::Borrowed("login.html"),
        home_page: Cow::Borrowed("index.html"),
        cart_page: Cow::Borrowed("cart.html"),
    };

    /// Relative URL for a navigation destination.
    #[must_use]
    pub fn href(&self, destination: Destination) -> &str {
        match destination {
            Destination::Login => &self.login_page,
            Destination::Home => &self.home_page,
            Destination::Cart => &self.cart_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pages_are_site_relative() {
        let config = ShellConfig::default();
        assert_eq!(config.href(Destination::Login), "login.html");
        assert_eq!(config.href(Destination::Home), "index.html");
        assert_eq!(config.href(Destination::Cart), "cart.html");
    }

    #[test]
    fn overridden_pages_are_used() {
        let config = ShellConfig {
            login_page: "/shop/login.html".into(),
            ..ShellConfig::default()
        };
        assert_eq!(config.href(Destination::Login), "/shop/login.html");
    }
}
