//! `localStorage` / `sessionStorage` as a [`KeyValueStore`].
use shopshell_core::{KeyValueStore, StoreError};
use web_sys::Storage;

use crate::dom::{self, js_error_message};
use crate::error::ShellError;

/// Browser storage area implementing the core store trait.
#[derive(Debug, Clone)]
pub struct BrowserStore {
    storage: Storage,
}

impl BrowserStore {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// The durable store.
    ///
    /// # Errors
    /// Returns an error if `localStorage` is unavailable.
    pub fn local() -> Result<Self, ShellError> {
        dom::local_storage().map(Self::new)
    }

    /// The tab-scoped store.
    ///
    /// # Errors
    /// Returns an error if `sessionStorage` is unavailable.
    pub fn session() -> Result<Self, ShellError> {
        dom::session_storage().map(Self::new)
    }
}

impl KeyValueStore for BrowserStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.storage
            .get_item(key)
            .map_err(|err| backend("get", key, &err))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.storage
            .set_item(key, value)
            .map_err(|err| backend("set", key, &err))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.storage
            .remove_item(key)
            .map_err(|err| backend("remove", key, &err))
    }
}

fn backend(op: &'static str, key: &str, err: &wasm_bindgen::JsValue) -> StoreError {
    StoreError::Backend {
        op,
        key: key.to_string(),
        message: js_error_message(err),
    }
}
