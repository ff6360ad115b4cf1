//! The per-seat player component.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EntityId, PlayerId};
use crate::hooks::PlayerHooks;

/// One side of a coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinFlip {
    Heads,
    Tails,
}

impl CoinFlip {
    #[must_use]
    pub fn is_heads(self) -> bool {
        self == CoinFlip::Heads
    }
}

/// A coin flip made this turn, kept for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinFlipRecord {
    /// Card that asked for the flip.
    pub card: EntityId,
    /// Flipped on behalf of the opponent.
    pub opponent_flip: bool,
    pub tosses: SmallVec<[CoinFlip; 4]>,
}

#[derive(Clone, Debug)]
pub struct PlayerComponent {
    pub entity: EntityId,
    pub seat: PlayerId,
    pub name: String,

    // === Piles ===
    /// Hand, in display order.
    pub hand: Vec<EntityId>,
    /// Deck, top card first.
    pub deck: Vec<EntityId>,
    /// Discard pile, oldest first.
    pub discard: Vec<EntityId>,
    pub hand_slot: EntityId,
    pub deck_slot: EntityId,
    pub discard_slot: EntityId,

    // === Board ===
    pub rows: Vec<EntityId>,
    pub single_use_slot: EntityId,
    pub active_row: Option<EntityId>,
    /// The single-use card in the slot has been applied this turn.
    pub single_use_used: bool,

    pub lives: u8,
    pub coin_flips: Vec<CoinFlipRecord>,
    /// Boxed to keep the player table's map nodes small.
    pub hooks: Box<PlayerHooks>,
}

impl PlayerComponent {
    /// Position of a card in the hand.
    #[must_use]
    pub fn hand_index(&self, card: EntityId) -> Option<usize> {
        self.hand.iter().position(|&c| c == card)
    }

    /// Remove a card from whichever pile holds it.
    pub fn remove_from_piles(&mut self, card: EntityId) {
        self.hand.retain(|&c| c != card);
        self.deck.retain(|&c| c != card);
        self.discard.retain(|&c| c != card);
    }
}
