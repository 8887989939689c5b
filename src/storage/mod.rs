//! Key/value storage backends for the deck mirror.
//!
//! The store only ever deals in strings; JSON encoding is done by the caller.
//! Two backends ship with the crate:
//!
//! - [`MemoryStorage`] — a plain `HashMap`, used natively and in tests.
//! - [`BridgeStorage`] — the browser backend. WASM running in a Web Worker has
//!   no `sessionStorage`, so writes are queued and handed back to the JS bridge
//!   as a `<script>` after each request.

pub mod bridge;

use std::collections::HashMap;
use thiserror::Error;

pub use bridge::BridgeStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing key '{key}'")]
    QuotaExceeded { key: String },
}

/// String key/value storage with `sessionStorage` semantics.
pub trait KeyValueStorage {
    /// Read a value by key. `Ok(None)` if the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (overwrite) a value under key.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a storage pre-populated with a single entry.
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut items = HashMap::new();
        items.insert(key.to_string(), value.to_string());
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("cards").unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn memory_storage_overwrites() {
        let mut storage = MemoryStorage::with_item("cards", "[]");
        storage.set_item("cards", r#"[{"id":0}]"#).unwrap();
        assert_eq!(storage.get_item("cards").unwrap().as_deref(), Some(r#"[{"id":0}]"#));
        assert!(!storage.is_empty());
    }
}
