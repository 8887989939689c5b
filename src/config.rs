//! Deck configuration — storage keys and display labels.
//!
//! Passed from JS as JSON through the `configure` export. Every field has a
//! default, so `{}` is a valid config.

use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "cards";
pub const DEFAULT_COUNTER_KEY: &str = "cards_next_id";
pub const DEFAULT_DELETED_LABEL: &str = "DELETED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// `sessionStorage` key holding the JSON card array.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// `sessionStorage` key holding the next card id.
    #[serde(default = "default_counter_key")]
    pub counter_key: String,
    /// Description written over a destroyed card.
    #[serde(default = "default_deleted_label")]
    pub deleted_label: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_counter_key() -> String {
    DEFAULT_COUNTER_KEY.to_string()
}

fn default_deleted_label() -> String {
    DEFAULT_DELETED_LABEL.to_string()
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            counter_key: default_counter_key(),
            deleted_label: default_deleted_label(),
        }
    }
}

impl DeckConfig {
    /// Parse a config from JSON. Blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    /// Parse a config, falling back to the defaults on bad input.
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(cfg) => {
                log::info!("Loaded deck config (storage key '{}')", cfg.storage_key);
                cfg
            }
            Err(e) => {
                log::warn!("Using default deck config; cannot parse config JSON: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = DeckConfig::from_json("{}").unwrap();
        assert_eq!(cfg, DeckConfig::default());
        assert_eq!(cfg.storage_key, "cards");
        assert_eq!(cfg.deleted_label, "DELETED");
    }

    #[test]
    fn blank_input_uses_defaults() {
        assert_eq!(DeckConfig::from_json("  ").unwrap(), DeckConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = DeckConfig::from_json(r#"{"deleted_label":"GONE"}"#).unwrap();
        assert_eq!(cfg.deleted_label, "GONE");
        assert_eq!(cfg.counter_key, "cards_next_id");
    }

    #[test]
    fn invalid_json_falls_back() {
        assert!(DeckConfig::from_json("not json").is_err());
        assert_eq!(DeckConfig::from_json_or_default("not json"), DeckConfig::default());
    }
}
