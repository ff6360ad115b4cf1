use crate::attacks::{AttackModel, AttackType};
use crate::cards::{Card, CardKind, CardProps, Rarity};
use crate::components::{CardComponent, StatusEffectTarget};
use crate::core::{EntityId, GameState};
use crate::hooks::hook;

const fn attach_props(id: &'static str, numeric_id: u16, name: &'static str, tokens: u8, description: &'static str) -> CardProps {
    CardProps {
        id,
        numeric_id,
        name,
        expansion: "default",
        rarity: Rarity::Common,
        tokens,
        description,
        kind: CardKind::Attach,
    }
}

/// Attacks armor may reduce: anything aimed at the row except status
/// effects and backlash.
fn armor_applies(game: &GameState, attack: &AttackModel, card: EntityId) -> bool {
    game.is_targeting(attack, card) && attack.attack_type != AttackType::StatusEffect && !attack.is_backlash
}

/// Damage already blocked by one armor card this turn.
#[derive(Clone, Copy, Debug, Default)]
struct Blocked(u32);

/// Reduce damage to the armored row by up to `limit` per turn.
fn subscribe_armor(game: &mut GameState, card: EntityId, observer: EntityId, limit: u32) {
    let Some(player) = game.card_player(card) else {
        return;
    };
    game.subscribe(observer, player, hook::on_defence, move |game, attack| {
        if !armor_applies(game, attack, card) {
            return;
        }
        let Blocked(blocked) = game.observer_state::<Blocked>(observer);
        let reduction = attack.calculate_damage().min(limit.saturating_sub(blocked));
        if reduction > 0 {
            attack.reduce_damage(Some(card), reduction);
            game.update_observer_state::<Blocked, _>(observer, |b| b.0 += reduction);
        }
    });

    for p in [Some(player), game.opponent_of(player)].into_iter().flatten() {
        game.subscribe(observer, p, hook::on_turn_end, move |game, _| {
            game.update_observer_state::<Blocked, _>(observer, |b| b.0 = 0);
        });
    }
}

pub struct GoldArmor;

static GOLD_ARMOR: CardProps = attach_props(
    "gold_armor",
    32,
    "Gold Armour",
    0,
    "When the Hermit this card is attached to takes damage, that damage is reduced by up to 10hp each turn.",
);

impl Card for GoldArmor {
    fn props(&self) -> &CardProps {
        &GOLD_ARMOR
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        subscribe_armor(game, card, observer, 10);
    }
}

pub struct IronArmor;

static IRON_ARMOR: CardProps = attach_props(
    "iron_armor",
    44,
    "Iron Armour",
    0,
    "When the Hermit this card is attached to takes damage, that damage is reduced by up to 20hp each turn.",
);

impl Card for IronArmor {
    fn props(&self) -> &CardProps {
        &IRON_ARMOR
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        subscribe_armor(game, card, observer, 20);
    }
}

/// Whether thorns already fired this turn.
#[derive(Clone, Copy, Debug, Default)]
struct Triggered(bool);

pub struct Thorns;

static THORNS: CardProps = attach_props(
    "thorns",
    96,
    "Thorns",
    2,
    "When the Hermit this card is attached to takes damage, your opponent's active Hermit takes 20hp damage.\nIgnores armour.",
);

/// Armor attach cards, which thorns damage ignores.
fn is_armor(game: &GameState, owner: EntityId) -> bool {
    game.components
        .get::<CardComponent>(owner)
        .is_some_and(|c| matches!(c.id(), "gold_armor" | "iron_armor"))
}

impl Card for Thorns {
    fn props(&self) -> &CardProps {
        &THORNS
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        let Some(opponent) = game.opponent_of(player) else {
            return;
        };

        game.subscribe(observer, opponent, hook::after_attack, move |game, attack| {
            let Triggered(triggered) = game.observer_state::<Triggered>(observer);
            if triggered
                || attack.is_backlash
                || !attack.is_type(&[AttackType::Primary, AttackType::Secondary, AttackType::Effect])
                || attack.calculate_damage() == 0
                || !game.is_targeting(attack, card)
            {
                return;
            }
            let Some(attacking_row) = game.attacking_hermit(attack).and_then(|h| game.row_of_card(h)) else {
                return;
            };

            let mut backlash = AttackModel::new(AttackType::Effect)
                .with_creator(card)
                .with_attacker(Some(card))
                .with_target(Some(attacking_row))
                .backlash()
                .ignoring(is_armor)
                .with_log(|v| format!("{} took {} damage from $eThorns$", v.target, v.damage));
            backlash.add_damage(Some(card), 20);
            attack.add_next_attack(backlash);
            game.update_observer_state::<Triggered, _>(observer, |t| t.0 = true);
        });

        game.subscribe(observer, opponent, hook::on_turn_end, move |game, _| {
            game.update_observer_state::<Triggered, _>(observer, |t| t.0 = false);
        });
    }
}

pub struct Furnace;

static FURNACE: CardProps = attach_props(
    "furnace",
    122,
    "Furnace",
    1,
    "After 4 of your turns, all single item cards attached to that Hermit are converted to double item cards. This card is then discarded.",
);

impl Card for Furnace {
    fn props(&self) -> &CardProps {
        &FURNACE
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, _observer: EntityId) {
        game.apply_status_effect("smelting", StatusEffectTarget::Card(card), Some(card));
    }
}
