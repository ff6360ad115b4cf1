//! Smelting, applied by the furnace.

use tracing::debug;

use super::{StatusEffect, StatusEffectProps};
use crate::cards::{CardCategory, Rarity};
use crate::components::{CardComponent, RowComponent, StatusEffectTarget};
use crate::core::{EntityId, GameState};
use crate::hooks::hook;

pub struct Smelting;

static SMELTING: StatusEffectProps = StatusEffectProps {
    id: "smelting",
    name: "Smelting",
    description: "When the counter reaches 0, upgrades all item cards attached to this hermit to double items.",
    damage_effect: false,
    counter: Some(4),
};

/// Swap every common item in `row` for its rare version.
fn upgrade_items(game: &mut GameState, row: EntityId) {
    let Some(items) = game.components.get::<RowComponent>(row).map(|r| r.item_slots.clone()) else {
        return;
    };
    for slot in items {
        let Some(card) = game.card_in_slot(slot) else {
            continue;
        };
        let Some(component) = game.components.get::<CardComponent>(card) else {
            continue;
        };
        if component.category() != CardCategory::Item || component.props().rarity != Rarity::Common {
            continue;
        }
        let rare_id = component.id().replace("_common", "_rare");
        let Some(rare) = game.registry.get(&rare_id) else {
            continue;
        };
        if let Some(c) = game.components.get_mut::<CardComponent>(card) {
            c.card = rare;
            debug!(%card, id = %rare_id, "item upgraded");
        }
    }
}

impl StatusEffect for Smelting {
    fn props(&self) -> &StatusEffectProps {
        &SMELTING
    }

    fn on_apply(&self, game: &mut GameState, effect: EntityId, target: StatusEffectTarget, observer: EntityId) {
        let StatusEffectTarget::Card(card) = target else {
            return;
        };
        let Some(owner) = game.components.get::<CardComponent>(card).map(|c| c.player) else {
            return;
        };

        game.subscribe(observer, owner, hook::on_turn_start, move |game, _| {
            if game.tick_status_effect(effect) != Some(0) {
                return;
            }
            if let Some(row) = game.row_of_card(card) {
                upgrade_items(game, row);
            }
            game.remove_status_effect(effect);
            game.discard_card(card);
        });
    }
}
