//! Burn and poison.
//!
//! Both deal damage to the hermit they sit on at the end of every turn of
//! the hermit owner's opponent, as a status-effect attack run in
//! extra-attack mode.

use super::{StatusEffect, StatusEffectProps};
use crate::attacks::{AttackLogValues, AttackModel, AttackType};
use crate::components::{CardComponent, RowComponent, StatusEffectTarget};
use crate::core::{EntityId, GameState};
use crate::hooks::hook;

const BURN_DAMAGE: u32 = 20;
const POISON_DAMAGE: u32 = 20;
/// Poison never takes a hermit below this.
const POISON_FLOOR: u32 = 10;

/// Install the end-of-opponent-turn damage tick.
fn subscribe_tick(
    game: &mut GameState,
    effect: EntityId,
    target: StatusEffectTarget,
    observer: EntityId,
    amount: fn(u32) -> u32,
    log: fn(&AttackLogValues) -> String,
) {
    let StatusEffectTarget::Card(card) = target else {
        return;
    };
    let Some(owner) = game.components.get::<CardComponent>(card).map(|c| c.player) else {
        return;
    };
    let Some(opponent) = game.opponent_of(owner) else {
        return;
    };

    game.subscribe(observer, opponent, hook::on_turn_end, move |game, _| {
        let Some(row) = game.row_of_card(card) else {
            game.remove_status_effect(effect);
            return;
        };
        let Some(health) = game.components.get::<RowComponent>(row).and_then(|r| r.health) else {
            return;
        };
        let damage = amount(health);
        if damage == 0 {
            return;
        }
        let mut attack = AttackModel::new(AttackType::StatusEffect)
            .with_creator(effect)
            .with_attacker(Some(effect))
            .with_target(Some(row))
            .with_log(log);
        attack.add_damage(Some(effect), damage);
        game.execute_extra_attacks(vec![attack]);
    });
}

pub struct Burn;

static BURN: StatusEffectProps = StatusEffectProps {
    id: "fire",
    name: "Burn",
    description: "Burned hermits take an additional 20hp damage at the end of their opponent's turn, until knocked out.",
    damage_effect: true,
    counter: None,
};

impl StatusEffect for Burn {
    fn props(&self) -> &StatusEffectProps {
        &BURN
    }

    fn on_apply(&self, game: &mut GameState, effect: EntityId, target: StatusEffectTarget, observer: EntityId) {
        subscribe_tick(game, effect, target, observer, |_| BURN_DAMAGE, |v| {
            format!("{} took {} damage from $bBurn$", v.target, v.damage)
        });
    }
}

pub struct Poison;

static POISON: StatusEffectProps = StatusEffectProps {
    id: "poison",
    name: "Poison",
    description: "Poisoned hermits take an additional 20hp damage at the end of their opponent's turn. Poison can not knock out hermits.",
    damage_effect: true,
    counter: None,
};

/// 20 from 30hp up, then 10, never taking the hermit below 10hp.
#[must_use]
pub fn poison_damage(health: u32) -> u32 {
    if health >= 30 {
        POISON_DAMAGE
    } else {
        health.saturating_sub(POISON_FLOOR).min(POISON_DAMAGE / 2)
    }
}

impl StatusEffect for Poison {
    fn props(&self) -> &StatusEffectProps {
        &POISON
    }

    fn on_apply(&self, game: &mut GameState, effect: EntityId, target: StatusEffectTarget, observer: EntityId) {
        subscribe_tick(game, effect, target, observer, poison_damage, |v| {
            format!("{} took {} damage from $bPoison$", v.target, v.damage)
        });
    }
}
