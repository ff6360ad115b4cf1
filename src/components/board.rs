//! Slots and rows.
//!
//! Every place a card can be is a slot: the board slots of a row (hermit,
//! attach, three items), the single-use slot, and one pile slot each for a
//! player's hand, deck and discard. Board slots hold at most one card;
//! pile slots hold any number, ordered by the player component.

use serde::{Deserialize, Serialize};

use crate::cards::CardCategory;
use crate::core::EntityId;

/// What a slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Hermit,
    Attach,
    Item,
    SingleUse,
    Hand,
    Deck,
    Discard,
}

impl SlotKind {
    /// Board slots hold at most one card and keep it attached (observed).
    #[must_use]
    pub const fn is_board(self) -> bool {
        matches!(
            self,
            SlotKind::Hermit | SlotKind::Attach | SlotKind::Item | SlotKind::SingleUse
        )
    }

    #[must_use]
    pub const fn is_pile(self) -> bool {
        !self.is_board()
    }

    /// The card category a board slot accepts.
    #[must_use]
    pub const fn accepts(self) -> Option<CardCategory> {
        match self {
            SlotKind::Hermit => Some(CardCategory::Hermit),
            SlotKind::Attach => Some(CardCategory::Attach),
            SlotKind::Item => Some(CardCategory::Item),
            SlotKind::SingleUse => Some(CardCategory::SingleUse),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotComponent {
    pub entity: EntityId,
    pub kind: SlotKind,
    /// Owning player entity.
    pub player: EntityId,
    /// Row for hermit/attach/item slots.
    pub row: Option<EntityId>,
    /// Position among the row's item slots; 0 otherwise.
    pub index: u8,
}

impl SlotComponent {
    #[must_use]
    pub fn is_board(&self) -> bool {
        self.kind.is_board()
    }
}

/// One row of a player's board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowComponent {
    pub entity: EntityId,
    pub player: EntityId,
    /// 0-based position on the board.
    pub index: u8,
    /// Current health; `None` when no hermit is in the row.
    pub health: Option<u32>,
    pub hermit_slot: EntityId,
    pub attach_slot: EntityId,
    pub item_slots: Vec<EntityId>,
}

impl RowComponent {
    /// All board slots of this row, hermit first.
    pub fn slots(&self) -> impl Iterator<Item = EntityId> + '_ {
        [self.hermit_slot, self.attach_slot]
            .into_iter()
            .chain(self.item_slots.iter().copied())
    }
}
