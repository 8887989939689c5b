//! Session-lifetime deck held in WASM memory.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The Web Worker keeps the module alive, so the deck persists across
//! `handle_request` calls until the tab closes. Route handlers never touch
//! this directly; they are handed `&mut CardStore` by the router.

use std::cell::RefCell;

use crate::config::DeckConfig;
use crate::deck::store::CardStore;
use crate::storage::BridgeStorage;

pub type SessionStore = CardStore<BridgeStorage>;

thread_local! {
    static STORE: RefCell<SessionStore> = RefCell::new(CardStore::new(BridgeStorage::new()));
}

/// Execute a closure with read access to the session deck.
pub fn with_store<F, R>(f: F) -> R
where
    F: FnOnce(&SessionStore) -> R,
{
    STORE.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the session deck.
pub fn with_store_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut SessionStore) -> R,
{
    STORE.with(|s| f(&mut s.borrow_mut()))
}

/// Replace the session deck with an empty one using `config`.
pub fn reset_store(config: DeckConfig) {
    STORE.with(|s| {
        *s.borrow_mut() = CardStore::with_config(BridgeStorage::new(), config);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_is_empty() {
        reset_store(DeckConfig::default());
        with_store(|s| {
            assert!(s.cards().is_empty());
            assert_eq!(s.config().storage_key, "cards");
        });
    }

    #[test]
    fn mutations_survive_between_calls() {
        reset_store(DeckConfig::default());
        with_store_mut(|s| s.create_card("Zombie").unwrap());
        with_store(|s| assert_eq!(s.cards().len(), 1));
        reset_store(DeckConfig::default());
    }

    #[test]
    fn reset_applies_config() {
        let config = DeckConfig {
            storage_key: "deck".to_string(),
            ..DeckConfig::default()
        };
        reset_store(config);
        with_store(|s| assert_eq!(s.config().storage_key, "deck"));
        reset_store(DeckConfig::default());
    }
}
