//! In-memory [`KeyValueStore`] for tests and the scenario tester.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::{KeyValueStore, StoreError};

/// Clones share the same map, the way two tabs share one `localStorage`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<Cell<bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-filled with `pairs`.
    #[must_use]
    pub fn with_entries<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::default();
        store.entries.borrow_mut().extend(
            pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        store
    }

    /// Make every later write fail, as a full quota would.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn check_writable(&self, op: &'static str, key: &str) -> Result<(), StoreError> {
        if self.read_only.get() {
            return Err(StoreError::Backend {
                op,
                key: key.to_string(),
                message: "store is read-only".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    type Error = StoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.check_writable("set", key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.check_writable("remove", key)?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
