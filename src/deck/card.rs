//! Card records as stored in `sessionStorage`.

use serde::{Deserialize, Serialize};

/// Per-card play state. Serialized through the `discarded` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Discarded,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub description: String,
    /// `true` while the card sits in the discard pile. New cards start here.
    pub discarded: bool,
    /// How many shuffles in a row the card has stayed in play. Never below 1.
    pub stack: u32,
}

impl Card {
    /// A freshly created card: discarded, stack of one.
    pub fn new(id: u32, description: &str) -> Self {
        Self {
            id,
            description: description.to_string(),
            discarded: true,
            stack: 1,
        }
    }

    pub fn status(&self) -> CardStatus {
        if self.discarded {
            CardStatus::Discarded
        } else {
            CardStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        !self.discarded
    }

    /// Bring the card into play. A card that was already in play grows its
    /// stack; a card coming back from the discard pile restarts at 1.
    pub fn shuffle_in(&mut self) {
        match self.status() {
            CardStatus::Discarded => self.stack = 1,
            CardStatus::Active => self.stack = self.stack.saturating_add(1),
        }
        self.discarded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_card_starts_discarded() {
        let card = Card::new(0, "Zombie");
        assert_eq!(card.status(), CardStatus::Discarded);
        assert_eq!(card.stack, 1);
        assert!(!card.is_active());
    }

    #[test]
    fn shuffle_in_resets_discarded_stack() {
        let mut card = Card {
            id: 2,
            description: "Horde".to_string(),
            discarded: true,
            stack: 4,
        };
        card.shuffle_in();
        assert_eq!(card.status(), CardStatus::Active);
        assert_eq!(card.stack, 1);
    }

    #[test]
    fn shuffle_in_grows_active_stack() {
        let mut card = Card::new(0, "Zombie");
        card.shuffle_in();
        card.shuffle_in();
        card.shuffle_in();
        assert!(card.is_active());
        assert_eq!(card.stack, 3);
    }

    #[test]
    fn serializes_with_plain_keys() {
        let json = serde_json::to_string(&Card::new(0, "Zombie")).unwrap();
        assert_eq!(
            json,
            r#"{"id":0,"description":"Zombie","discarded":true,"stack":1}"#
        );
    }
}
