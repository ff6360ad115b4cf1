//! Row predicates.

use super::Query;
use crate::components::RowComponent;
use crate::core::EntityId;

#[must_use]
pub fn entity(entity: EntityId) -> Query<RowComponent> {
    Query::new(move |_, r: &RowComponent| r.entity == entity)
}

#[must_use]
pub fn index(index: u8) -> Query<RowComponent> {
    Query::new(move |_, r: &RowComponent| r.index == index)
}

#[must_use]
pub fn player(player: EntityId) -> Query<RowComponent> {
    Query::new(move |_, r: &RowComponent| r.player == player)
}

#[must_use]
pub fn current_player() -> Query<RowComponent> {
    Query::new(|game, r: &RowComponent| Some(r.player) == game.current_player_entity())
}

#[must_use]
pub fn opponent() -> Query<RowComponent> {
    Query::new(|game, r: &RowComponent| Some(r.player) == game.opponent_player_entity())
}

/// A hermit card sits in the row's hermit slot.
#[must_use]
pub fn has_hermit() -> Query<RowComponent> {
    Query::new(|game, r: &RowComponent| game.card_in_slot(r.hermit_slot).is_some())
}

/// The row is its player's active row.
#[must_use]
pub fn active() -> Query<RowComponent> {
    Query::new(|game, r: &RowComponent| game.active_row_of(r.player) == Some(r.entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::every;
    use crate::test_support::two_player_game;

    #[test]
    fn test_rows_per_player() {
        let game = two_player_game();
        assert_eq!(game.filter(&current_player()).len(), 5);
        assert_eq!(game.filter(&opponent()).len(), 5);
        assert_eq!(game.filter(&every([current_player(), index(4)])).len(), 1);
    }

    #[test]
    fn test_no_hermits_at_start() {
        let game = two_player_game();
        assert!(!game.exists(&has_hermit()));
        assert!(!game.exists(&active()));
    }
}
