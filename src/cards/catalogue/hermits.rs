use crate::attacks::{AttackModel, AttackType};
use crate::cards::{Card, CardKind, CardProps, EnergyType, HermitAttack, HermitProps, HermitType, Rarity};
use crate::components::{RowComponent, StatusEffectTarget};
use crate::core::{EntityId, GameState};
use crate::hooks::hook;

use super::knockback_request;

const ANY: EnergyType = EnergyType::Any;
const BUILDER: EnergyType = EnergyType::Typed(HermitType::Builder);
const FARM: EnergyType = EnergyType::Typed(HermitType::Farm);
const REDSTONE: EnergyType = EnergyType::Typed(HermitType::Redstone);
const SPEEDRUNNER: EnergyType = EnergyType::Typed(HermitType::Speedrunner);

/// Whether `attack` is the secondary attack of `card`.
fn is_own_secondary(attack: &AttackModel, card: EntityId) -> bool {
    attack.attacker() == Some(card) && attack.attack_type == AttackType::Secondary
}

pub const ETHOSLAB_COMMON: CardProps = CardProps {
    id: "ethoslab_common",
    numeric_id: 20,
    name: "Etho",
    expansion: "default",
    rarity: Rarity::Common,
    tokens: 0,
    description: "",
    kind: CardKind::Hermit(HermitProps {
        hermit_type: HermitType::Redstone,
        health: 280,
        primary: HermitAttack { name: "Oh Snappers", cost: &[REDSTONE], damage: 60, power: None },
        secondary: HermitAttack { name: "Blue Fire", cost: &[REDSTONE, REDSTONE], damage: 80, power: None },
    }),
};

pub struct FalseSymmetryRare;

static FALSE_SYMMETRY: CardProps = CardProps {
    id: "falsesymmetry_rare",
    numeric_id: 23,
    name: "False",
    expansion: "default",
    rarity: Rarity::Rare,
    tokens: 1,
    description: "",
    kind: CardKind::Hermit(HermitProps {
        hermit_type: HermitType::Builder,
        health: 250,
        primary: HermitAttack { name: "High Noon", cost: &[BUILDER], damage: 60, power: None },
        secondary: HermitAttack {
            name: "Supremacy",
            cost: &[BUILDER, ANY],
            damage: 70,
            power: Some("Flip a coin.\nIf heads, heal this Hermit 40hp."),
        },
    }),
};

impl Card for FalseSymmetryRare {
    fn props(&self) -> &CardProps {
        &FALSE_SYMMETRY
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        game.subscribe(observer, player, hook::on_attack, move |game, attack| {
            if !is_own_secondary(attack, card) {
                return;
            }
            let flip = game.flip_coin(card, 1);
            if !flip.first().is_some_and(|f| f.is_heads()) {
                return;
            }
            if let Some(row) = game.row_of_card(card) {
                game.heal_row(row, 40);
                let name = FALSE_SYMMETRY.name;
                game.add_custom_entry(player, format!("$p{name}$ healed $g40hp$"));
            }
        });
    }
}

pub struct IJevinRare;

static IJEVIN: CardProps = CardProps {
    id: "ijevin_rare",
    numeric_id: 39,
    name: "Jevin",
    expansion: "default",
    rarity: Rarity::Rare,
    tokens: 1,
    description: "",
    kind: CardKind::Hermit(HermitProps {
        hermit_type: HermitType::Speedrunner,
        health: 300,
        primary: HermitAttack { name: "Your Boi", cost: &[ANY], damage: 30, power: None },
        secondary: HermitAttack {
            name: "Peace Out",
            cost: &[SPEEDRUNNER, SPEEDRUNNER, ANY],
            damage: 90,
            power: Some("After your attack, your opponent must choose an AFK Hermit to set as their active Hermit, unless they have no AFK Hermits."),
        },
    }),
};

impl Card for IJevinRare {
    fn props(&self) -> &CardProps {
        &IJEVIN
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        game.subscribe(observer, player, hook::after_attack, move |game, attack| {
            if !is_own_secondary(attack, card) {
                return;
            }
            if let Some(opponent) = game.opponent_of(player) {
                knockback_request(game, card, opponent);
            }
        });
    }
}

pub struct Iskall85Rare;

static ISKALL85: CardProps = CardProps {
    id: "iskall85_rare",
    numeric_id: 48,
    name: "Iskall",
    expansion: "default",
    rarity: Rarity::Rare,
    tokens: 1,
    description: "",
    kind: CardKind::Hermit(HermitProps {
        hermit_type: HermitType::Farm,
        health: 290,
        primary: HermitAttack { name: "Of Doom", cost: &[FARM], damage: 50, power: None },
        secondary: HermitAttack {
            name: "Bird Poop",
            cost: &[FARM, FARM],
            damage: 80,
            power: Some("Attack damage doubles versus Builder types."),
        },
    }),
};

impl Card for Iskall85Rare {
    fn props(&self) -> &CardProps {
        &ISKALL85
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        game.subscribe(observer, player, hook::before_attack, move |game, attack| {
            if !is_own_secondary(attack, card) {
                return;
            }
            let target_type = game.target_hermit(attack).and_then(|h| game.hermit_type_of(h));
            if target_type == Some(HermitType::Builder) {
                attack.multiply_damage(Some(card), 2.0);
            }
        });
    }
}

pub struct DreamRare;

static DREAM: CardProps = CardProps {
    id: "dream_rare",
    numeric_id: 117,
    name: "Dream",
    expansion: "default",
    rarity: Rarity::Rare,
    tokens: 2,
    description: "",
    kind: CardKind::Hermit(HermitProps {
        hermit_type: HermitType::Speedrunner,
        health: 290,
        primary: HermitAttack { name: "C'mere", cost: &[SPEEDRUNNER, ANY], damage: 50, power: None },
        secondary: HermitAttack {
            name: "Transition",
            cost: &[SPEEDRUNNER, SPEEDRUNNER, ANY],
            damage: 90,
            power: Some("Flip a coin.\nIf heads, HP is set randomly between 10-290."),
        },
    }),
};

impl Card for DreamRare {
    fn props(&self) -> &CardProps {
        &DREAM
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        game.subscribe(observer, player, hook::on_attack, move |game, attack| {
            if !is_own_secondary(attack, card) {
                return;
            }
            let flip = game.flip_coin(card, 1);
            if !flip.first().is_some_and(|f| f.is_heads()) {
                return;
            }
            let Some(row) = game.row_of_card(card) else {
                return;
            };
            let health = game.rng_mut().roll(1..=28) * 10;
            if let Some(r) = game.components.get_mut::<RowComponent>(row) {
                r.health = Some(health);
            }
        });
    }
}

pub struct XisumavoidRare;

static XISUMAVOID: CardProps = CardProps {
    id: "xisumavoid_rare",
    numeric_id: 112,
    name: "Xisuma",
    expansion: "default",
    rarity: Rarity::Rare,
    tokens: 2,
    description: "",
    kind: CardKind::Hermit(HermitProps {
        hermit_type: HermitType::Redstone,
        health: 280,
        primary: HermitAttack { name: "Goodtimes with Hem", cost: &[REDSTONE], damage: 60, power: None },
        secondary: HermitAttack {
            name: "Cup of Tea",
            cost: &[REDSTONE, REDSTONE],
            damage: 80,
            power: Some("Opponent is poisoned."),
        },
    }),
};

impl Card for XisumavoidRare {
    fn props(&self) -> &CardProps {
        &XISUMAVOID
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        game.subscribe(observer, player, hook::after_attack, move |game, attack| {
            if !is_own_secondary(attack, card) {
                return;
            }
            if let Some(target) = game.target_hermit(attack) {
                game.apply_status_effect("poison", StatusEffectTarget::Card(target), Some(card));
            }
        });
    }
}
