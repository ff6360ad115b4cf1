//! Effects that disable one attack of a hermit for its owner's next turn.

use super::{StatusEffect, StatusEffectProps};
use crate::components::{CardComponent, StatusEffectTarget};
use crate::core::{EntityId, GameState, TurnAction};
use crate::hooks::hook;

/// Block `action` while the target hermit is active on its owner's next
/// turn, then remove `effect` at the end of that turn.
fn disable_next_turn(
    game: &mut GameState,
    effect: EntityId,
    target: StatusEffectTarget,
    observer: EntityId,
    action: TurnAction,
) {
    let StatusEffectTarget::Card(card) = target else {
        return;
    };
    let Some(player) = game.components.get::<CardComponent>(card).map(|c| c.player) else {
        return;
    };

    if game.current_player_entity() == Some(player) && game.active_hermit(player) == Some(card) {
        game.turn.block(Some(effect), &[action]);
    }
    game.subscribe(observer, player, hook::on_turn_start, move |game, _| {
        if game.active_hermit(player) == Some(card) {
            game.turn.block(Some(effect), &[action]);
        }
    });
    game.subscribe(observer, player, hook::on_turn_end, move |game, _| {
        game.remove_status_effect(effect);
    });
}

pub struct PrimaryAttackDisabled;

static PRIMARY: StatusEffectProps = StatusEffectProps {
    id: "primary-attack-disabled",
    name: "Primary Attack Disabled",
    description: "This hermit's primary attack is disabled for this turn.",
    damage_effect: false,
    counter: None,
};

impl StatusEffect for PrimaryAttackDisabled {
    fn props(&self) -> &StatusEffectProps {
        &PRIMARY
    }

    fn on_apply(&self, game: &mut GameState, effect: EntityId, target: StatusEffectTarget, observer: EntityId) {
        disable_next_turn(game, effect, target, observer, TurnAction::PrimaryAttack);
    }
}

pub struct SecondaryAttackDisabled;

static SECONDARY: StatusEffectProps = StatusEffectProps {
    id: "secondary-attack-disabled",
    name: "Secondary Attack Disabled",
    description: "This hermit's secondary attack is disabled for this turn.",
    damage_effect: false,
    counter: None,
};

impl StatusEffect for SecondaryAttackDisabled {
    fn props(&self) -> &StatusEffectProps {
        &SECONDARY
    }

    fn on_apply(&self, game: &mut GameState, effect: EntityId, target: StatusEffectTarget, observer: EntityId) {
        disable_next_turn(game, effect, target, observer, TurnAction::SecondaryAttack);
    }
}
