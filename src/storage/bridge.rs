//! `sessionStorage` mirror for the Web Worker bridge.
//!
//! ## Lifecycle
//!
//! - **Page load:** the bridge reads each key with `sessionStorage.getItem` and
//!   posts it to `/api/cards/restore`, which calls [`BridgeStorage::seed`].
//! - **Every mutation:** writes land in the local mirror and are queued.
//! - **End of request:** the router drains the queue with
//!   [`BridgeStorage::take_pending`] and appends [`persist_script`] to the
//!   response, which replays the writes on the main thread in order.

use std::collections::HashMap;

use super::{KeyValueStorage, StorageError};

/// Browsers cap `sessionStorage` at roughly 5 MiB per origin.
pub const SESSION_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// A write the main thread still has to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct BridgeStorage {
    items: HashMap<String, String>,
    pending: Vec<PendingWrite>,
    quota_bytes: usize,
}

impl Default for BridgeStorage {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            pending: Vec::new(),
            quota_bytes: SESSION_QUOTA_BYTES,
        }
    }
}

impl BridgeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror with a custom quota (tests use a tiny one).
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes,
            ..Self::default()
        }
    }

    /// Load a value the bridge read from `sessionStorage`. `None` means the
    /// key was absent (`getItem` returned `null`). Seeding never queues a write.
    pub fn seed(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(v) => {
                self.items.insert(key.to_string(), v.to_string());
            }
            None => {
                self.items.remove(key);
            }
        }
    }

    /// Drain queued writes, oldest first.
    pub fn take_pending(&mut self) -> Vec<PendingWrite> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        let others: usize = self
            .items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }
}

impl KeyValueStorage for BridgeStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.used_bytes_with(key, value) > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        self.items.insert(key.to_string(), value.to_string());
        self.pending.push(PendingWrite {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }
}

/// Quote a string as a JS literal that is safe inside an inline `<script>`.
fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// Render queued writes as an inline script for the main thread.
/// Returns an empty string when there is nothing to write.
pub fn persist_script(writes: &[PendingWrite]) -> String {
    if writes.is_empty() {
        return String::new();
    }
    let mut js = String::with_capacity(256);
    js.push_str("<script>\n(function() {\n");
    for write in writes {
        js.push_str(&format!(
            "  sessionStorage.setItem({}, {});\n",
            js_string(&write.key),
            js_string(&write.value)
        ));
    }
    js.push_str("})();\n</script>");
    js
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_does_not_queue_writes() {
        let mut storage = BridgeStorage::new();
        storage.seed("cards", Some("[]"));
        assert_eq!(storage.get_item("cards").unwrap().as_deref(), Some("[]"));
        assert!(!storage.has_pending());
    }

    #[test]
    fn seed_none_clears_key() {
        let mut storage = BridgeStorage::new();
        storage.seed("cards", Some("[]"));
        storage.seed("cards", None);
        assert_eq!(storage.get_item("cards").unwrap(), None);
    }

    #[test]
    fn writes_are_queued_in_order() {
        let mut storage = BridgeStorage::new();
        storage.set_item("cards", "[]").unwrap();
        storage.set_item("cards_next_id", "3").unwrap();

        let pending = storage.take_pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(
            pending[0],
            PendingWrite {
                key: "cards".to_string(),
                value: "[]".to_string()
            }
        );
        assert_eq!(pending[1].key, "cards_next_id");
        assert_eq!(pending[1].value, "3");
        assert!(!storage.has_pending());
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let mut storage = BridgeStorage::with_quota(16);
        assert!(storage.set_item("cards", "[]").is_ok());
        let err = storage.set_item("cards", "x".repeat(64).as_str());
        assert!(matches!(err, Err(StorageError::QuotaExceeded { .. })));
        // Mirror keeps the last good value
        assert_eq!(storage.get_item("cards").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn persist_script_empty_for_no_writes() {
        assert_eq!(persist_script(&[]), "");
    }

    #[test]
    fn persist_script_escapes_values() {
        let writes = vec![PendingWrite {
            key: "cards".to_string(),
            value: r#"[{"description":"</script><b>'x'"}]"#.to_string(),
        }];
        let js = persist_script(&writes);
        assert!(js.contains("sessionStorage.setItem(\"cards\""));
        assert!(!js.contains("</script><b>"));
        assert!(js.contains(r#"<\/script>"#));
        assert!(js.ends_with("</script>"));
    }
}
