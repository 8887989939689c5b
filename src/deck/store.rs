//! The card store — owns the deck and keeps its storage mirror in sync.
//!
//! The in-memory `Vec<Card>` is the source of truth. Storage is read once by
//! [`CardStore::initialize`] and overwritten wholesale after every mutation.
//! Ids come from a counter persisted next to the deck, so they stay unique
//! across destroys and clears.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

use crate::config::DeckConfig;
use crate::deck::card::Card;
use crate::storage::{KeyValueStorage, StorageError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("corrupt deck data: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("cannot encode deck: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid deck file: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("no card ids left")]
    IdsExhausted,
}

/// Snapshot of the deck for rendering, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckView<'a> {
    pub cards: &'a [Card],
    /// At least one card is in play.
    pub shuffled: bool,
    pub active: usize,
    pub discarded: usize,
    /// Cards whose description equals the deleted label. The label is the
    /// only destroyed marker, so a card created with that exact text also
    /// counts here.
    pub destroyed: usize,
}

#[derive(Debug)]
pub struct CardStore<S> {
    cards: Vec<Card>,
    /// Next id to hand out. Wider than `u32` so the counter can sit one past
    /// the last valid id instead of handing it out twice.
    next_id: u64,
    config: DeckConfig,
    storage: S,
}

/// Lowest id the counter may hold for the given cards.
fn id_floor(cards: &[Card]) -> u64 {
    cards
        .iter()
        .map(|c| u64::from(c.id) + 1)
        .max()
        .unwrap_or(0)
}

/// Restore `stack >= 1` on cards that came from outside the store.
fn clamp_stacks(cards: &mut [Card]) {
    for card in cards.iter_mut().filter(|c| c.stack == 0) {
        card.stack = 1;
    }
}

impl<S: KeyValueStorage> CardStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, DeckConfig::default())
    }

    pub fn with_config(storage: S, config: DeckConfig) -> Self {
        Self {
            cards: Vec::new(),
            next_id: 0,
            config,
            storage,
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Hydrate the deck from storage. A missing entry gives an empty deck.
    /// A malformed entry is reported as [`StoreError::Corrupt`] and the deck
    /// is left empty; the stored id counter is still applied.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        self.cards.clear();

        let stored_counter = self
            .storage
            .get_item(&self.config.counter_key)?
            .and_then(|s| s.trim().parse::<u64>().ok());
        self.next_id = stored_counter.unwrap_or(0);

        let mut cards: Vec<Card> = match self.storage.get_item(&self.config.storage_key)? {
            None => Vec::new(),
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                log::warn!(
                    "Stored deck under '{}' is not valid JSON: {}",
                    self.config.storage_key,
                    e
                );
                StoreError::Corrupt(e)
            })?,
        };
        clamp_stacks(&mut cards);

        let floor = id_floor(&cards);
        self.next_id = match stored_counter {
            Some(n) => n.max(floor),
            None => {
                if !cards.is_empty() {
                    log::warn!("No id counter stored, recovering next id as {}", floor);
                }
                floor
            }
        };

        log::debug!("Deck initialized with {} cards, next id {}", cards.len(), self.next_id);
        self.cards = cards;
        Ok(())
    }

    /// Write the full deck and the id counter to storage.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.cards).map_err(StoreError::Encode)?;
        self.storage.set_item(&self.config.storage_key, &json)?;
        self.storage
            .set_item(&self.config.counter_key, &self.next_id.to_string())?;
        Ok(())
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Empty the deck. The id counter keeps counting.
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.cards.clear();
        log::debug!("Deck cleared");
        self.persist()
    }

    /// Append a new discarded card. An empty description is ignored.
    /// Returns the new card's id, or [`StoreError::IdsExhausted`] once every
    /// `u32` id has been handed out.
    pub fn create_card(&mut self, description: &str) -> Result<Option<u32>, StoreError> {
        if description.is_empty() {
            return Ok(None);
        }
        let id = u32::try_from(self.next_id).map_err(|_| StoreError::IdsExhausted)?;
        self.next_id += 1;
        self.cards.push(Card::new(id, description));
        log::debug!("Created card {} '{}'", id, description);
        self.persist()?;
        Ok(Some(id))
    }

    /// Put every card into play. Cards already in play grow their stack,
    /// cards coming from the discard pile restart at 1.
    pub fn shuffle(&mut self) -> Result<(), StoreError> {
        for card in self.cards.iter_mut() {
            card.shuffle_in();
        }
        log::debug!("Shuffled {} cards", self.cards.len());
        self.persist()
    }

    /// Move the card with `id` to the discard pile. Returns whether a card matched.
    pub fn discard(&mut self, id: u32) -> Result<bool, StoreError> {
        let matched = self.update_matching(id, |card| card.discarded = true);
        self.persist()?;
        Ok(matched)
    }

    /// Put the card with `id` back into play. Returns whether a card matched.
    pub fn infect(&mut self, id: u32) -> Result<bool, StoreError> {
        let matched = self.update_matching(id, |card| card.discarded = false);
        self.persist()?;
        Ok(matched)
    }

    /// Overwrite the card's description with the deleted label. The card
    /// stays in the deck. Returns whether a card matched.
    pub fn destroy(&mut self, id: u32) -> Result<bool, StoreError> {
        let label = self.config.deleted_label.clone();
        let matched = self.update_matching(id, |card| card.description = label.clone());
        self.persist()?;
        Ok(matched)
    }

    /// Replace the whole deck. Only `stack >= 1` and the id counter are
    /// enforced on the incoming cards.
    pub fn replace_cards(&mut self, mut cards: Vec<Card>) -> Result<(), StoreError> {
        clamp_stacks(&mut cards);
        self.next_id = self.next_id.max(id_floor(&cards));
        self.cards = cards;
        log::debug!("Deck replaced with {} cards", self.cards.len());
        self.persist()
    }

    fn update_matching<F>(&mut self, id: u32, mut f: F) -> bool
    where
        F: FnMut(&mut Card),
    {
        let mut matched = false;
        for card in self.cards.iter_mut().filter(|c| c.id == id) {
            f(card);
            matched = true;
        }
        if !matched {
            log::debug!("No card with id {}", id);
        }
        matched
    }

    // ── Import / export ────────────────────────────────────────────

    /// The deck as the JSON array that goes into storage.
    pub fn export_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(&self.cards).map_err(StoreError::Encode)
    }

    /// Replace the deck from a JSON array. Nothing changes if it doesn't parse.
    pub fn import_json(&mut self, json: &str) -> Result<usize, StoreError> {
        let cards: Vec<Card> = serde_json::from_str(json).map_err(StoreError::Corrupt)?;
        let count = cards.len();
        self.replace_cards(cards)?;
        Ok(count)
    }

    /// The deck as URL-safe base64 JSON, for a downloadable file.
    pub fn export_encoded(&self) -> Result<String, StoreError> {
        Ok(URL_SAFE_NO_PAD.encode(self.export_json()?))
    }

    /// Replace the deck from a previously exported file.
    pub fn import_encoded(&mut self, encoded: &str) -> Result<usize, StoreError> {
        let bytes = URL_SAFE_NO_PAD.decode(encoded.trim())?;
        let cards: Vec<Card> = serde_json::from_slice(&bytes).map_err(StoreError::Corrupt)?;
        let count = cards.len();
        self.replace_cards(cards)?;
        Ok(count)
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// True iff at least one card is in play.
    pub fn is_shuffled(&self) -> bool {
        self.cards.iter().any(Card::is_active)
    }

    pub fn view(&self) -> DeckView<'_> {
        let active = self.cards.iter().filter(|c| c.is_active()).count();
        let destroyed = self
            .cards
            .iter()
            .filter(|c| c.description == self.config.deleted_label)
            .count();
        DeckView {
            cards: &self.cards,
            shuffled: active > 0,
            active,
            discarded: self.cards.len() - active,
            destroyed,
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
