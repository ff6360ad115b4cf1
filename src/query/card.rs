//! Card predicates.

use super::Query;
use crate::cards::CardCategory;
use crate::components::{CardComponent, RowComponent, SlotComponent};
use crate::core::EntityId;

#[must_use]
pub fn entity(entity: EntityId) -> Query<CardComponent> {
    Query::new(move |_, c: &CardComponent| c.entity == entity)
}

/// Card id, e.g. `"gold_armor"`.
#[must_use]
pub fn id(id: &'static str) -> Query<CardComponent> {
    Query::new(move |_, c: &CardComponent| c.id() == id)
}

#[must_use]
pub fn category(category: CardCategory) -> Query<CardComponent> {
    Query::new(move |_, c: &CardComponent| c.category() == category)
}

#[must_use]
pub fn hermit() -> Query<CardComponent> {
    category(CardCategory::Hermit)
}

#[must_use]
pub fn item() -> Query<CardComponent> {
    category(CardCategory::Item)
}

#[must_use]
pub fn attach() -> Query<CardComponent> {
    category(CardCategory::Attach)
}

#[must_use]
pub fn single_use() -> Query<CardComponent> {
    category(CardCategory::SingleUse)
}

#[must_use]
pub fn player(player: EntityId) -> Query<CardComponent> {
    Query::new(move |_, c: &CardComponent| c.player == player)
}

#[must_use]
pub fn current_player() -> Query<CardComponent> {
    Query::new(|game, c: &CardComponent| Some(c.player) == game.current_player_entity())
}

#[must_use]
pub fn opponent() -> Query<CardComponent> {
    Query::new(|game, c: &CardComponent| Some(c.player) == game.opponent_player_entity())
}

/// In a slot matching `query`.
#[must_use]
pub fn slot(query: Query<SlotComponent>) -> Query<CardComponent> {
    Query::new(move |game, c: &CardComponent| {
        game.components
            .get::<SlotComponent>(c.slot)
            .is_some_and(|s| query.matches(game, s))
    })
}

/// In a row matching `query`.
#[must_use]
pub fn row(query: Query<RowComponent>) -> Query<CardComponent> {
    Query::new(move |game, c: &CardComponent| {
        game.components
            .get::<SlotComponent>(c.slot)
            .and_then(|s| s.row)
            .and_then(|r| game.components.get::<RowComponent>(r))
            .is_some_and(|r| query.matches(game, r))
    })
}

/// Attached to a board slot.
#[must_use]
pub fn on_board() -> Query<CardComponent> {
    Query::new(|game, c: &CardComponent| {
        game.components
            .get::<SlotComponent>(c.slot)
            .is_some_and(SlotComponent::is_board)
    })
}

/// In its player's active row.
#[must_use]
pub fn active() -> Query<CardComponent> {
    row(super::row::active())
}
