//! The attack value object and its damage ledger.
//!
//! An `AttackModel` lives for one resolution. Hooks mutate it through the
//! ledger methods, each of which appends to the history so later hooks
//! (backlash cards, the battle log) can see who changed what.
//!
//! ```
//! use hc_engine::attacks::{AttackModel, AttackType};
//! use hc_engine::core::EntityId;
//!
//! let armor = Some(EntityId(7));
//! let mut attack = AttackModel::new(AttackType::Secondary);
//! attack.add_damage(None, 80).reduce_damage(armor, 10);
//! assert_eq!(attack.calculate_damage(), 70);
//!
//! attack.lock_damage(None).add_damage(None, 50);
//! assert_eq!(attack.calculate_damage(), 70);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cards::HermitAttackType;
use crate::core::{EntityId, GameState, TurnAction};

/// What kind of attack this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    Primary,
    Secondary,
    SingleUse,
    Effect,
    Weakness,
    StatusEffect,
}

/// When resolution adds a weakness sub-attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaknessPolicy {
    Always,
    /// Only if the attacking hermit's type is strong against the target's.
    IfWeak,
    #[default]
    Never,
}

/// One modification of an attack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttackChange {
    Created,
    AddDamage(u32),
    ReduceDamage(u32),
    MultiplyDamage(f64),
    LockDamage,
    SetAttacker(Option<EntityId>),
    SetTarget(Option<EntityId>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackHistory {
    /// Card or status effect that made the change; `None` for the engine.
    pub source: Option<EntityId>,
    pub change: AttackChange,
}

/// Predicate over hook owners; matching owners' hooks are skipped.
pub type IgnorePredicate = Arc<dyn Fn(&GameState, EntityId) -> bool + Send + Sync>;

/// Builds the battle-log line for a resolved attack.
pub type AttackLogFn = Arc<dyn Fn(&AttackLogValues) -> String + Send + Sync>;

/// Pre-formatted pieces handed to an attack's log factory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttackLogValues {
    /// Attacking hermit or card, e.g. `$pEthosLab$`.
    pub attacker: String,
    /// Target hermit with row, e.g. `$oXisumavoid (2)$`.
    pub target: String,
    /// Attack name, e.g. `$vSlab$`.
    pub attack_name: String,
    /// Damage, e.g. `$b70hp$`.
    pub damage: String,
    /// "$pYou$" or "$pName$" for the attacking player.
    pub player: String,
    pub opponent: String,
    /// Coin flip description, empty if none.
    pub coin_flip: String,
    /// Card used before the attack (single-use header).
    pub header: String,
}

/// Passed to `get_attack` hooks when an attack action is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackRequest {
    /// `PRIMARY_ATTACK`, `SECONDARY_ATTACK` or `SINGLE_USE_ATTACK`.
    pub action: TurnAction,
    /// The attacking player's active hermit card, if any.
    pub hermit: Option<EntityId>,
}

#[derive(Clone)]
pub struct AttackModel {
    pub attack_type: AttackType,
    /// Attacking card or status effect.
    attacker: Option<EntityId>,
    /// Target row.
    target: Option<EntityId>,
    creator: Option<EntityId>,

    // === Ledger ===
    damage: u32,
    multiplier: f64,
    reduction: u32,
    locked: bool,
    history: Vec<AttackHistory>,

    /// Attacks resolved right after this one.
    pub next_attacks: Vec<AttackModel>,
    pub should_ignore: Vec<IgnorePredicate>,
    pub is_backlash: bool,
    pub create_weakness: WeaknessPolicy,
    pub log: Option<AttackLogFn>,
}

impl AttackModel {
    #[must_use]
    pub fn new(attack_type: AttackType) -> Self {
        Self {
            attack_type,
            attacker: None,
            target: None,
            creator: None,
            damage: 0,
            multiplier: 1.0,
            reduction: 0,
            locked: false,
            history: Vec::new(),
            next_attacks: Vec::new(),
            should_ignore: Vec::new(),
            is_backlash: false,
            create_weakness: WeaknessPolicy::default(),
            log: None,
        }
    }

    // === Builder ===

    /// Record the card or effect that created this attack.
    #[must_use]
    pub fn with_creator(mut self, creator: EntityId) -> Self {
        self.creator = Some(creator);
        self.history.push(AttackHistory {
            source: Some(creator),
            change: AttackChange::Created,
        });
        self
    }

    #[must_use]
    pub fn with_attacker(mut self, attacker: Option<EntityId>) -> Self {
        self.attacker = attacker;
        self
    }

    #[must_use]
    pub fn with_target(mut self, row: Option<EntityId>) -> Self {
        self.target = row;
        self
    }

    #[must_use]
    pub fn with_weakness(mut self, policy: WeaknessPolicy) -> Self {
        self.create_weakness = policy;
        self
    }

    #[must_use]
    pub fn backlash(mut self) -> Self {
        self.is_backlash = true;
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: impl Fn(&AttackLogValues) -> String + Send + Sync + 'static) -> Self {
        self.log = Some(Arc::new(log));
        self
    }

    /// Skip hooks of owners matching `predicate` for this attack.
    #[must_use]
    pub fn ignoring(mut self, predicate: impl Fn(&GameState, EntityId) -> bool + Send + Sync + 'static) -> Self {
        self.should_ignore.push(Arc::new(predicate));
        self
    }

    // === Ledger ===

    /// Add flat damage. No-op once locked.
    pub fn add_damage(&mut self, source: Option<EntityId>, amount: u32) -> &mut Self {
        if !self.locked {
            self.damage = self.damage.saturating_add(amount);
            self.push(source, AttackChange::AddDamage(amount));
        }
        self
    }

    /// Add flat reduction. No-op once locked.
    pub fn reduce_damage(&mut self, source: Option<EntityId>, amount: u32) -> &mut Self {
        if !self.locked {
            self.reduction = self.reduction.saturating_add(amount);
            self.push(source, AttackChange::ReduceDamage(amount));
        }
        self
    }

    /// Scale the multiplier, clamped at 0. No-op once locked.
    pub fn multiply_damage(&mut self, source: Option<EntityId>, factor: f64) -> &mut Self {
        if !self.locked {
            self.multiplier = (self.multiplier * factor).max(0.0);
            self.push(source, AttackChange::MultiplyDamage(factor));
        }
        self
    }

    /// Freeze the ledger for the rest of resolution.
    pub fn lock_damage(&mut self, source: Option<EntityId>) -> &mut Self {
        self.locked = true;
        self.push(source, AttackChange::LockDamage);
        self
    }

    pub fn set_attacker(&mut self, source: Option<EntityId>, attacker: Option<EntityId>) -> &mut Self {
        self.attacker = attacker;
        self.push(source, AttackChange::SetAttacker(attacker));
        self
    }

    /// Retarget to another row (or none).
    pub fn set_target(&mut self, source: Option<EntityId>, row: Option<EntityId>) -> &mut Self {
        self.target = row;
        self.push(source, AttackChange::SetTarget(row));
        self
    }

    pub fn add_next_attack(&mut self, attack: AttackModel) -> &mut Self {
        self.next_attacks.push(attack);
        self
    }

    fn push(&mut self, source: Option<EntityId>, change: AttackChange) {
        self.history.push(AttackHistory { source, change });
    }

    // === Getters ===

    /// `max(damage * multiplier - reduction, 0)`, truncated to whole hp.
    #[must_use]
    pub fn calculate_damage(&self) -> u32 {
        let raw = f64::from(self.damage) * self.multiplier - f64::from(self.reduction);
        raw.max(0.0) as u32
    }

    #[must_use]
    pub fn damage(&self) -> u32 {
        self.damage
    }

    #[must_use]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    #[must_use]
    pub fn reduction(&self) -> u32 {
        self.reduction
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn attacker(&self) -> Option<EntityId> {
        self.attacker
    }

    #[must_use]
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    #[must_use]
    pub fn creator(&self) -> Option<EntityId> {
        self.creator
    }

    #[must_use]
    pub fn history(&self) -> &[AttackHistory] {
        &self.history
    }

    /// History entries of one kind, e.g. every reduction.
    pub fn history_of<'a>(
        &'a self,
        matches: impl Fn(&AttackChange) -> bool + 'a,
    ) -> impl Iterator<Item = &'a AttackHistory> + 'a {
        self.history.iter().filter(move |h| matches(&h.change))
    }

    #[must_use]
    pub fn is_type(&self, types: &[AttackType]) -> bool {
        types.contains(&self.attack_type)
    }

    /// Whether hooks owned by `owner` must be skipped for this attack.
    #[must_use]
    pub fn should_ignore(&self, game: &GameState, owner: EntityId) -> bool {
        self.should_ignore.iter().any(|p| p(game, owner))
    }

    /// This attack and all chained attacks, depth first.
    #[must_use]
    pub fn flatten(&self) -> Vec<&AttackModel> {
        let mut out = vec![self];
        for next in &self.next_attacks {
            out.extend(next.flatten());
        }
        out
    }
}

impl From<HermitAttackType> for AttackType {
    fn from(kind: HermitAttackType) -> Self {
        match kind {
            HermitAttackType::Primary => AttackType::Primary,
            HermitAttackType::Secondary => AttackType::Secondary,
        }
    }
}

impl fmt::Debug for AttackModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackModel")
            .field("type", &self.attack_type)
            .field("attacker", &self.attacker)
            .field("target", &self.target)
            .field("damage", &self.damage)
            .field("multiplier", &self.multiplier)
            .field("reduction", &self.reduction)
            .field("locked", &self.locked)
            .field("next_attacks", &self.next_attacks)
            .finish_non_exhaustive()
    }
}
