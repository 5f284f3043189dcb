//! Shopshell core
//!
//! Platform-agnostic state for the shop page shell: who is signed in, what is
//! in their cart and what the account dropdown should show. Everything here is
//! recomputed from the injected key-value stores on demand; the web crate only
//! applies the resulting view models and effects to the DOM.

pub mod account;
pub mod cart;
pub mod config;
pub mod effects;
pub mod keys;
pub mod memory;
pub mod session;
pub mod user;

pub use account::AccountView;
pub use cart::{Cart, CartLineItem, NewLineItem, ProductId, coerce_price, parse_price_text};
pub use config::ShellConfig;
pub use effects::{Destination, Effect, Reaction};
pub use memory::MemoryStore;
pub use session::Session;
pub use user::User;

/// Errors raised by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage {op} failed for `{key}`: {message}")]
    Backend {
        op: &'static str,
        key: String,
        message: String,
    },
}

/// Trait for abstracting string key-value storage
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + 'static;

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    type Error = T::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }
}
