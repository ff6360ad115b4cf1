//! Slot predicates.

use super::Query;
use crate::components::{CardComponent, RowComponent, SlotComponent, SlotKind};
use crate::core::EntityId;

#[must_use]
pub fn kind(kind: SlotKind) -> Query<SlotComponent> {
    Query::new(move |_, s: &SlotComponent| s.kind == kind)
}

#[must_use]
pub fn hermit() -> Query<SlotComponent> {
    kind(SlotKind::Hermit)
}

#[must_use]
pub fn attach() -> Query<SlotComponent> {
    kind(SlotKind::Attach)
}

#[must_use]
pub fn item() -> Query<SlotComponent> {
    kind(SlotKind::Item)
}

#[must_use]
pub fn single_use() -> Query<SlotComponent> {
    kind(SlotKind::SingleUse)
}

#[must_use]
pub fn hand() -> Query<SlotComponent> {
    kind(SlotKind::Hand)
}

#[must_use]
pub fn discard() -> Query<SlotComponent> {
    kind(SlotKind::Discard)
}

/// Hermit, attach, item and single-use slots.
#[must_use]
pub fn board() -> Query<SlotComponent> {
    Query::new(|_, s: &SlotComponent| s.is_board())
}

#[must_use]
pub fn entity(entity: EntityId) -> Query<SlotComponent> {
    Query::new(move |_, s: &SlotComponent| s.entity == entity)
}

/// Owned by the given player entity.
#[must_use]
pub fn player(player: EntityId) -> Query<SlotComponent> {
    Query::new(move |_, s: &SlotComponent| s.player == player)
}

/// On the side of the player whose turn it is.
#[must_use]
pub fn current_player() -> Query<SlotComponent> {
    Query::new(|game, s: &SlotComponent| Some(s.player) == game.current_player_entity())
}

/// On the side of the player whose turn it is not.
#[must_use]
pub fn opponent() -> Query<SlotComponent> {
    Query::new(|game, s: &SlotComponent| Some(s.player) == game.opponent_player_entity())
}

/// No card in the slot (piles: the pile is empty).
#[must_use]
pub fn empty() -> Query<SlotComponent> {
    Query::new(|game, s: &SlotComponent| game.is_slot_empty(s.entity))
}

/// In the row with this board index.
#[must_use]
pub fn row_index(index: u8) -> Query<SlotComponent> {
    Query::new(move |game, s: &SlotComponent| {
        s.row
            .and_then(|r| game.components.get::<RowComponent>(r))
            .is_some_and(|r| r.index == index)
    })
}

/// Item-slot position within the row.
#[must_use]
pub fn index(index: u8) -> Query<SlotComponent> {
    Query::new(move |_, s: &SlotComponent| s.index == index)
}

/// In its player's active row.
#[must_use]
pub fn active() -> Query<SlotComponent> {
    Query::new(|game, s: &SlotComponent| {
        s.row.is_some() && s.row == game.active_row_of(s.player)
    })
}

/// In a row matching `query`.
#[must_use]
pub fn row(query: Query<RowComponent>) -> Query<SlotComponent> {
    Query::new(move |game, s: &SlotComponent| {
        s.row
            .and_then(|r| game.components.get::<RowComponent>(r))
            .is_some_and(|r| query.matches(game, r))
    })
}

/// Holds a card matching `query`.
#[must_use]
pub fn has_card(query: Query<CardComponent>) -> Query<SlotComponent> {
    Query::new(move |game, s: &SlotComponent| {
        game.card_in_slot(s.entity)
            .and_then(|c| game.components.get::<CardComponent>(c))
            .is_some_and(|c| query.matches(game, c))
    })
}

/// Frozen by some card's `freeze_slots` hook.
///
/// Reads the frozen set computed by the last `refresh_frozen_slots`.
#[must_use]
pub fn frozen() -> Query<SlotComponent> {
    Query::new(|game, s: &SlotComponent| game.frozen_slots().iter().any(|q| q.matches(game, s)))
}
