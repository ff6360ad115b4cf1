//! Card definitions: static card data.
//!
//! `CardProps` holds the immutable properties of a card type ("Iron Sword
//! deals 20 damage"). Everything that changes during a game lives on the
//! `CardComponent` instead. Props are `const`-constructible so the built-in
//! catalogue is plain static data.

use serde::{Deserialize, Serialize};

/// Broad card category; decides which slots a card can go into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    Hermit,
    Item,
    Attach,
    SingleUse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    UltraRare,
}

/// Hermit and item type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HermitType {
    Balanced,
    Builder,
    Explorer,
    Farm,
    Miner,
    Prankster,
    Pvp,
    Redstone,
    Speedrunner,
    Terraform,
}

impl HermitType {
    /// Types this type deals weakness damage to.
    #[must_use]
    pub const fn strengths(self) -> &'static [HermitType] {
        use HermitType::*;
        match self {
            Balanced => &[],
            Builder => &[Terraform, Explorer],
            Explorer => &[Farm, Builder],
            Farm => &[Terraform, Miner],
            Miner => &[Redstone, Prankster],
            Prankster => &[Builder, Explorer],
            Pvp => &[Speedrunner, Farm],
            Redstone => &[Speedrunner, Pvp],
            Speedrunner => &[Miner, Prankster],
            Terraform => &[Pvp, Redstone],
        }
    }

    #[must_use]
    pub fn is_strong_against(self, other: HermitType) -> bool {
        self.strengths().contains(&other)
    }
}

/// One unit of energy, as provided by items and required by attacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyType {
    Typed(HermitType),
    /// Satisfied by energy of any type.
    Any,
}

/// Primary or secondary hermit attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HermitAttackType {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HermitAttack {
    pub name: &'static str,
    pub cost: &'static [EnergyType],
    pub damage: u32,
    /// Rules text of the attack's power, if it has one.
    pub power: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HermitProps {
    pub hermit_type: HermitType,
    pub health: u32,
    pub primary: HermitAttack,
    pub secondary: HermitAttack,
}

impl HermitProps {
    #[must_use]
    pub const fn attack(&self, kind: HermitAttackType) -> &HermitAttack {
        match kind {
            HermitAttackType::Primary => &self.primary,
            HermitAttackType::Secondary => &self.secondary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemProps {
    pub energy: HermitType,
    /// Rare items provide two energy.
    pub count: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SingleUseProps {
    /// Contributes an attack, so the card can be used with `SINGLE_USE_ATTACK`.
    pub has_attack: bool,
    /// Applied through an explicit `APPLY_EFFECT` confirmation.
    pub confirm: bool,
}

/// Category-specific data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardKind {
    Hermit(HermitProps),
    Item(ItemProps),
    Attach,
    SingleUse(SingleUseProps),
}

/// Static props of one card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardProps {
    /// Registry key, e.g. `"iron_sword"`.
    pub id: &'static str,
    pub numeric_id: u16,
    pub name: &'static str,
    pub expansion: &'static str,
    pub rarity: Rarity,
    /// Deck-building cost.
    pub tokens: u8,
    pub description: &'static str,
    pub kind: CardKind,
}

impl CardProps {
    #[must_use]
    pub const fn category(&self) -> CardCategory {
        match self.kind {
            CardKind::Hermit(_) => CardCategory::Hermit,
            CardKind::Item(_) => CardCategory::Item,
            CardKind::Attach => CardCategory::Attach,
            CardKind::SingleUse(_) => CardCategory::SingleUse,
        }
    }

    #[must_use]
    pub const fn hermit(&self) -> Option<&HermitProps> {
        match &self.kind {
            CardKind::Hermit(h) => Some(h),
            _ => None,
        }
    }

    #[must_use]
    pub const fn item(&self) -> Option<&ItemProps> {
        match &self.kind {
            CardKind::Item(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn single_use(&self) -> Option<&SingleUseProps> {
        match &self.kind {
            CardKind::SingleUse(s) => Some(s),
            _ => None,
        }
    }

    /// Base health for hermits.
    #[must_use]
    pub fn health(&self) -> Option<u32> {
        self.hermit().map(|h| h.health)
    }
}
