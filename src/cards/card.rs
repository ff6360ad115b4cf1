//! The card behavior contract.
//!
//! A card type is a value implementing [`Card`], shared by every instance
//! through the registry. Behavior hangs off `on_attach`: the card
//! subscribes hooks through the observer it is given, and the engine tears
//! all of them down before `on_detach` returns.
//!
//! The engine guarantees:
//!
//! - `on_create` runs once, when the instance is created in the deck
//! - `on_attach` runs exactly once each time the card enters a board slot
//! - `on_detach` runs exactly once when it leaves, with the same observer
//!
//! Everything defaults to doing nothing, so a data-only card is just its
//! props (see [`PlainCard`]).

use super::definition::{CardCategory, CardProps, HermitAttackType};
use crate::attacks::{hermit_attack, AttackModel};
use crate::components::SlotComponent;
use crate::core::{EntityId, GameState};
use crate::log::PlayLogValues;
use crate::query::{self, row, slot, Query};

pub trait Card: Send + Sync {
    fn props(&self) -> &CardProps;

    fn on_create(&self, _game: &mut GameState, _card: EntityId) {}

    fn on_attach(&self, _game: &mut GameState, _card: EntityId, _observer: EntityId) {}

    fn on_detach(&self, _game: &mut GameState, _card: EntityId, _observer: EntityId) {}

    /// Slots this card may be played into.
    fn attach_condition(&self) -> Query<SlotComponent> {
        default_attach_condition(self.props().category())
    }

    /// The attack this card makes for a hermit attack action.
    fn get_attack(&self, game: &mut GameState, card: EntityId, kind: HermitAttackType) -> Option<AttackModel> {
        hermit_attack(game, card, kind)
    }

    /// Battle-log line for playing or applying this card.
    fn log(&self, values: &PlayLogValues) -> Option<String> {
        default_play_log(self.props().category(), values)
    }
}

/// Where a card of each category may go when nothing more specific is
/// required.
#[must_use]
pub fn default_attach_condition(category: CardCategory) -> Query<SlotComponent> {
    let own_free = || [slot::current_player(), slot::empty(), query::not(slot::frozen())];
    match category {
        CardCategory::Hermit => query::every(own_free().into_iter().chain([slot::hermit()])),
        CardCategory::Item => query::every(
            own_free()
                .into_iter()
                .chain([slot::item(), slot::row(row::has_hermit())]),
        ),
        CardCategory::Attach => query::every(
            own_free()
                .into_iter()
                .chain([slot::attach(), slot::row(row::has_hermit())]),
        ),
        CardCategory::SingleUse => {
            query::every([slot::single_use(), slot::current_player(), slot::empty()])
        }
    }
}

/// Placement lines for board cards. Single-use cards log nothing unless
/// they say otherwise.
#[must_use]
pub fn default_play_log(category: CardCategory, values: &PlayLogValues) -> Option<String> {
    let player = format!("$p{{You|{}}}$", values.player);
    let pos = &values.pos;
    match category {
        CardCategory::Hermit => {
            let row = pos.row_index.map_or(0, |r| u32::from(r) + 1);
            Some(format!("{player} placed $p{}$ on row #{row}", pos.name))
        }
        CardCategory::Item => Some(format!("{player} attached $m{}$ to $p{}$", pos.name, pos.hermit_card)),
        CardCategory::Attach => Some(format!("{player} attached $e{}$ to $p{}$", pos.name, pos.hermit_card)),
        CardCategory::SingleUse => None,
    }
}

/// A card with no behavior beyond its props.
#[derive(Clone, Copy, Debug)]
pub struct PlainCard(pub CardProps);

impl Card for PlainCard {
    fn props(&self) -> &CardProps {
        &self.0
    }
}

/// Default single-use log: `$pYou$ used $eCard$ `.
#[must_use]
pub fn single_use_log(values: &PlayLogValues) -> String {
    values.header.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::SlotKind;
    use crate::test_support::two_player_game;

    #[test]
    fn test_default_hermit_slots() {
        let game = two_player_game();
        let slots = game.filter(&default_attach_condition(CardCategory::Hermit));
        assert_eq!(slots.len(), 5);
        assert!(slots.iter().all(|s| s.kind == SlotKind::Hermit));
    }

    #[test]
    fn test_items_need_a_hermit() {
        let game = two_player_game();
        assert!(!game.exists(&default_attach_condition(CardCategory::Item)));
        assert!(!game.exists(&default_attach_condition(CardCategory::Attach)));
        assert!(game.exists(&default_attach_condition(CardCategory::SingleUse)));
    }
}
