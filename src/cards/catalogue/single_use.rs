use crate::attacks::{AttackModel, AttackType};
use crate::cards::{default_attach_condition, single_use_log, Card, CardCategory, CardKind, CardProps, Rarity, SingleUseProps};
use crate::components::{CardComponent, SlotComponent, StatusEffectTarget};
use crate::core::{EntityId, GameState};
use crate::hooks::hook;
use crate::log::PlayLogValues;
use crate::query::{self, slot, Query};
use crate::requests::{ActionResult, PickRequest};

use super::knockback_request;

const fn single_use_props(
    id: &'static str,
    numeric_id: u16,
    name: &'static str,
    rarity: Rarity,
    tokens: u8,
    description: &'static str,
    single_use: SingleUseProps,
) -> CardProps {
    CardProps {
        id,
        numeric_id,
        name,
        expansion: "default",
        rarity,
        tokens,
        description,
        kind: CardKind::SingleUse(single_use),
    }
}

const WITH_ATTACK: SingleUseProps = SingleUseProps { has_attack: true, confirm: false };
const CONFIRM: SingleUseProps = SingleUseProps { has_attack: false, confirm: true };
const PLAIN: SingleUseProps = SingleUseProps { has_attack: false, confirm: false };

/// Flat effect damage to the opponent's active hermit, applying the card
/// once the attack goes through.
fn subscribe_weapon(game: &mut GameState, card: EntityId, observer: EntityId, damage: u32) -> Option<EntityId> {
    let player = game.card_player(card)?;
    game.subscribe(observer, player, hook::get_attack, move |game, _request| {
        let opponent = game.opponent_of(player)?;
        let mut attack = AttackModel::new(AttackType::Effect)
            .with_creator(card)
            .with_attacker(Some(card))
            .with_target(game.active_row_of(opponent))
            .with_log(|v| format!("{}to attack {} for {} damage", v.header, v.target, v.damage));
        attack.add_damage(Some(card), damage);
        Some(attack)
    });
    game.subscribe(observer, player, hook::before_attack, move |game, attack| {
        if attack.creator() == Some(card) {
            game.apply_single_use(player, None);
        }
    });
    Some(player)
}

pub struct IronSword;

static IRON_SWORD: CardProps = single_use_props(
    "iron_sword",
    46,
    "Iron Sword",
    Rarity::Common,
    0,
    "Do an additional 20hp damage.",
    WITH_ATTACK,
);

impl Card for IronSword {
    fn props(&self) -> &CardProps {
        &IRON_SWORD
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        subscribe_weapon(game, card, observer, 20);
    }
}

pub struct GoldenAxe;

static GOLDEN_AXE: CardProps = single_use_props(
    "golden_axe",
    31,
    "Golden Axe",
    Rarity::Rare,
    2,
    "Do an additional 40hp damage.\nIgnores attached effect card.",
    WITH_ATTACK,
);

/// Attach cards in the active row of `opponent`.
fn is_active_effect_card(game: &GameState, owner: EntityId, opponent: EntityId) -> bool {
    let Some(c) = game.components.get::<CardComponent>(owner) else {
        return false;
    };
    c.player == opponent
        && c.category() == CardCategory::Attach
        && game.row_of_card(owner).is_some()
        && game.row_of_card(owner) == game.active_row_of(opponent)
}

impl Card for GoldenAxe {
    fn props(&self) -> &CardProps {
        &GOLDEN_AXE
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = subscribe_weapon(game, card, observer, 40) else {
            return;
        };
        game.subscribe(observer, player, hook::before_attack, move |game, attack| {
            let Some(opponent) = game.opponent_of(player) else {
                return;
            };
            attack
                .should_ignore
                .push(std::sync::Arc::new(move |g: &GameState, owner: EntityId| is_active_effect_card(g, owner, opponent)));
        });
    }
}

pub struct Knockback;

static KNOCKBACK: CardProps = single_use_props(
    "knockback",
    73,
    "Knockback",
    Rarity::Rare,
    1,
    "After your attack, your opponent must choose an AFK Hermit to set as their active Hermit, unless they have no AFK Hermits.",
    PLAIN,
);

impl Card for Knockback {
    fn props(&self) -> &CardProps {
        &KNOCKBACK
    }

    fn attach_condition(&self) -> Query<SlotComponent> {
        let opponent_afk = query::every([
            slot::opponent(),
            slot::hermit(),
            query::not(slot::active()),
            query::not(slot::empty()),
        ]);
        default_attach_condition(CardCategory::SingleUse).and(query::exists(opponent_afk))
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        game.subscribe_once(observer, player, hook::after_attack, move |game, _| {
            game.apply_single_use(player, None);
        });
        game.subscribe(observer, player, hook::on_apply, move |game, _| {
            if let Some(opponent) = game.opponent_of(player) {
                knockback_request(game, card, opponent);
            }
        });
    }

    fn log(&self, values: &PlayLogValues) -> Option<String> {
        Some(format!("{}with {{your|their}} attack", values.header))
    }
}

pub struct InstantHealth;

static INSTANT_HEALTH: CardProps = single_use_props(
    "instant_health",
    42,
    "Instant Health",
    Rarity::Common,
    0,
    "Heal one of your Hermits 30hp.",
    PLAIN,
);

const INSTANT_HEALTH_AMOUNT: u32 = 30;

fn own_hermits() -> Query<SlotComponent> {
    query::every([slot::current_player(), slot::hermit(), query::not(slot::empty())])
}

impl Card for InstantHealth {
    fn props(&self) -> &CardProps {
        &INSTANT_HEALTH
    }

    fn attach_condition(&self) -> Query<SlotComponent> {
        default_attach_condition(CardCategory::SingleUse).and(query::exists(own_hermits()))
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, _observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        let can_pick = query::every([slot::player(player), slot::hermit(), query::not(slot::empty())]);
        let request = PickRequest::new(player, card, "Pick one of your Hermits", can_pick, move |game, picked| {
            let Some(row) = game.components.get::<SlotComponent>(picked).and_then(|s| s.row) else {
                return ActionResult::FailureInvalidData;
            };
            game.apply_single_use(player, Some(picked));
            game.heal_row(row, INSTANT_HEALTH_AMOUNT);
            ActionResult::Success
        });
        game.add_pick_request(request);
    }

    fn log(&self, values: &PlayLogValues) -> Option<String> {
        let pick = values.pick.as_ref()?;
        Some(format!("{}on $p{}$ and healed $g30hp$", values.header, pick.name))
    }
}

/// Opponent has an active hermit to hit.
fn opponent_active_hermit() -> Query<SlotComponent> {
    query::every([slot::opponent(), slot::hermit(), slot::active(), query::not(slot::empty())])
}

/// Apply a status effect to the opponent's active hermit when the card is
/// applied.
fn subscribe_effect_on_apply(game: &mut GameState, card: EntityId, observer: EntityId, effect: &'static str) {
    let Some(player) = game.card_player(card) else {
        return;
    };
    game.subscribe(observer, player, hook::on_apply, move |game, _| {
        let Some(target) = game.opponent_of(player).and_then(|o| game.active_hermit(o)) else {
            return;
        };
        game.apply_status_effect(effect, StatusEffectTarget::Card(target), Some(card));
    });
}

pub struct LavaBucket;

static LAVA_BUCKET: CardProps = single_use_props(
    "lava_bucket",
    62,
    "Lava Bucket",
    Rarity::Rare,
    1,
    "Burn your opponent's active Hermit.",
    CONFIRM,
);

impl Card for LavaBucket {
    fn props(&self) -> &CardProps {
        &LAVA_BUCKET
    }

    fn attach_condition(&self) -> Query<SlotComponent> {
        default_attach_condition(CardCategory::SingleUse).and(query::exists(opponent_active_hermit()))
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        subscribe_effect_on_apply(game, card, observer, "fire");
    }

    fn log(&self, values: &PlayLogValues) -> Option<String> {
        Some(single_use_log(values))
    }
}

pub struct SplashPotionOfPoison;

static SPLASH_POTION_OF_POISON: CardProps = single_use_props(
    "splash_potion_of_poison",
    93,
    "Splash Potion of Poison",
    Rarity::Rare,
    1,
    "Poison your opponent's active Hermit.",
    CONFIRM,
);

impl Card for SplashPotionOfPoison {
    fn props(&self) -> &CardProps {
        &SPLASH_POTION_OF_POISON
    }

    fn attach_condition(&self) -> Query<SlotComponent> {
        default_attach_condition(CardCategory::SingleUse).and(query::exists(opponent_active_hermit()))
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        subscribe_effect_on_apply(game, card, observer, "poison");
    }

    fn log(&self, values: &PlayLogValues) -> Option<String> {
        Some(single_use_log(values))
    }
}
