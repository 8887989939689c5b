//! Deck module — the card store, its HTML rendering, and the session holder
//! that keeps it alive between requests.

pub mod card;
pub mod render;
pub mod session;
pub mod store;

pub use card::{Card, CardStatus};
pub use store::{CardStore, DeckView, StoreError};
