//! Signed-in state and cart operations over the two key-value stores.
//!
//! Every query re-reads storage: another tab may have changed it since the
//! last call. Reads that fail are treated as missing values, and failed
//! writes are logged and otherwise ignored, so no operation returns an error.
//!
//! Add-to-cart is a read-modify-write of the whole cart array without any
//! version check; two tabs adding at the same time can overwrite each other.
use chrono::{DateTime, Utc};

use crate::account::AccountView;
use crate::cart::{Cart, NewLineItem, coerce_price};
use crate::config::ShellConfig;
use crate::effects::{Destination, Effect, LOGGED_OUT_MESSAGE, Reaction, added_message};
use crate::keys::{self, CURRENT_USER, DARK_MODE, FLAG_FALSE, IS_LOGGED_IN};
use crate::user::User;
use crate::KeyValueStore;

/// Page-shell state backed by a durable store (`localStorage`) and a
/// session-scoped store (`sessionStorage`).
#[derive(Debug, Clone)]
pub struct Session<D, S> {
    durable: D,
    session: S,
    config: ShellConfig,
}

impl<D, S> Session<D, S>
where
    D: KeyValueStore,
    S: KeyValueStore,
{
    #[must_use]
    pub const fn new(durable: D, session: S) -> Self {
        Self {
            durable,
            session,
            config: ShellConfig::SITE,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ShellConfig {
        &self.config
    }

    #[must_use]
    pub const fn durable(&self) -> &D {
        &self.durable
    }

    #[must_use]
    pub const fn session_store(&self) -> &S {
        &self.session
    }

    /// True when either store's login flag is `"true"`.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        keys::flag_is_set(read(&self.durable, IS_LOGGED_IN).as_deref())
            || keys::flag_is_set(read(&self.session, IS_LOGGED_IN).as_deref())
    }

    /// The stored user record, if present and well-formed.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        User::parse(read(&self.durable, CURRENT_USER).as_deref())
    }

    /// The stored user, but only while a login flag is set.
    #[must_use]
    pub fn signed_in_user(&self) -> Option<User> {
        self.current_user().filter(|_| self.is_logged_in())
    }

    /// Cart of the signed-in user; empty when nobody is signed in.
    #[must_use]
    pub fn load_cart(&self) -> Cart {
        self.signed_in_user().map_or_else(Cart::new, |user| {
            Cart::parse(read(&self.durable, &keys::cart_key(&user.email)).as_deref())
        })
    }

    /// Badge count for the signed-in user.
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.load_cart().total_quantity()
    }

    #[must_use]
    pub fn account_view(&self) -> AccountView {
        AccountView::resolve(self.current_user().as_ref(), self.is_logged_in())
    }

    #[must_use]
    pub fn dark_mode(&self) -> bool {
        keys::flag_is_set(read(&self.session, DARK_MODE).as_deref())
    }

    /// Add one unit of `product` to the signed-in user's cart.
    ///
    /// Guests get the login-required reaction and storage is left untouched.
    /// An invalid price is stored as 0.
    pub fn add_to_cart(&self, product: NewLineItem, now: DateTime<Utc>) -> Reaction {
        let Some(user) = self.signed_in_user() else {
            log::info!("add to cart refused for guest: {}", product.id);
            return Reaction::login_required();
        };

        let price = coerce_price(product.price).unwrap_or_else(|| {
            log::warn!(
                "[addToCart] price is invalid or missing, defaulting to 0: {} {}",
                product.price,
                product.name
            );
            0.0
        });
        let name = product.name.clone();
        let cart_key = keys::cart_key(&user.email);
        let mut cart = Cart::parse(read(&self.durable, &cart_key).as_deref());
        let quantity = cart.add(NewLineItem { price, ..product }, now);
        log::debug!("{cart_key}: line quantity now {quantity}");

        match cart.to_json() {
            Ok(json) => write(&self.durable, &cart_key, &json),
            Err(err) => log::warn!("could not serialize {cart_key}: {err}"),
        }

        Reaction {
            badge: Some(cart.total_quantity()),
            refresh: false,
            effects: vec![Effect::Alert(added_message(&name))],
        }
    }

    /// Open the cart page, or send guests to the login page.
    pub fn toggle_cart(&self) -> Reaction {
        if self.signed_in_user().is_none() {
            return Reaction::login_required();
        }
        Reaction {
            effects: vec![Effect::Navigate(Destination::Cart)],
            ..Reaction::default()
        }
    }

    /// Forget the current user, clear both login flags and go home.
    pub fn logout(&self) -> Reaction {
        remove(&self.durable, CURRENT_USER);
        write(&self.durable, IS_LOGGED_IN, FLAG_FALSE);
        write(&self.session, IS_LOGGED_IN, FLAG_FALSE);
        log::info!("logged out");
        Reaction {
            badge: None,
            refresh: true,
            effects: vec![
                Effect::Alert(LOGGED_OUT_MESSAGE.to_string()),
                Effect::Navigate(Destination::Home),
            ],
        }
    }
}

fn read<K: KeyValueStore>(store: &K, key: &str) -> Option<String> {
    store.get(key).unwrap_or_else(|err| {
        log::debug!("treating unreadable `{key}` as missing: {err}");
        None
    })
}

fn write<K: KeyValueStore>(store: &K, key: &str, value: &str) {
    if let Err(err) = store.set(key, value) {
        log::warn!("{err}");
    }
}

fn remove<K: KeyValueStore>(store: &K, key: &str) {
    if let Err(err) = store.remove(key) {
        log::warn!("{err}");
    }
}
