//! Attack resolution.
//!
//! A batch of attacks runs through these phases:
//!
//! 1. `before_attack` (attacker's player) for every attack, then
//!    `before_defence` (target's player) for every attack
//! 2. `on_attack`, then `on_defence`
//! 3. resolve each attack: add a weakness sub-attack if the policy allows,
//!    apply the damage, then resolve its `next_attacks` as a nested batch
//! 4. unless in extra-attack mode, mark the attack actions completed and
//!    block card plays and active-hermit changes for the rest of the turn
//! 5. `after_attack`, then `after_defence`
//!
//! Attacks added to `next_attacks` by after-hooks run afterwards in
//! extra-attack mode.

use tracing::debug;

use super::model::{AttackModel, AttackType, WeaknessPolicy};
use crate::cards::HermitAttackType;
use crate::components::{CardComponent, RowComponent, StatusEffectComponent};
use crate::core::{EntityId, GameState, TurnAction};
use crate::hooks::{hook, HookSelector};

/// Source recorded for actions blocked by the engine itself.
pub const GAME_SOURCE: Option<EntityId> = None;

impl GameState {
    /// Run a batch of attacks through every phase. Returns the resolved
    /// attacks with their executed sub-attacks in `next_attacks`.
    pub fn execute_attacks(&mut self, mut attacks: Vec<AttackModel>, extra: bool) -> Vec<AttackModel> {
        debug!(count = attacks.len(), extra, "executing attack batch");

        if self.config.debug.disable_damage {
            for attack in attacks.iter_mut().filter(|a| a.attacker().is_some()) {
                attack.multiply_damage(None, 0.0).lock_damage(None);
            }
        }

        self.run_attack_phase(&mut attacks, hook::before_attack, hook::before_defence);
        self.run_attack_phase(&mut attacks, hook::on_attack, hook::on_defence);

        for attack in &mut attacks {
            self.resolve_attack(attack);
            if !attack.next_attacks.is_empty() {
                let next = std::mem::take(&mut attack.next_attacks);
                attack.next_attacks = self.execute_attacks(next, extra);
            }
        }

        if !extra {
            self.turn.add_completed(&TurnAction::ATTACKS);
            self.turn.block(
                GAME_SOURCE,
                &[
                    TurnAction::PlayHermitCard,
                    TurnAction::PlayItemCard,
                    TurnAction::PlayEffectCard,
                    TurnAction::PlaySingleUseCard,
                    TurnAction::ChangeActiveHermit,
                ],
            );
        }

        let resolved: Vec<usize> = attacks.iter().map(|a| a.next_attacks.len()).collect();
        self.run_attack_phase(&mut attacks, hook::after_attack, hook::after_defence);

        for (attack, count) in attacks.iter_mut().zip(resolved) {
            if attack.next_attacks.len() > count {
                let late = attack.next_attacks.split_off(count);
                let done = self.execute_attacks(late, true);
                attack.next_attacks.extend(done);
            }
        }

        attacks
    }

    /// Execute attacks outside an attack action (status effects, backlash
    /// triggered from turn hooks) and log them.
    pub fn execute_extra_attacks(&mut self, attacks: Vec<AttackModel>) -> Vec<AttackModel> {
        let resolved = self.execute_attacks(attacks, true);
        for attack in &resolved {
            self.add_attack_entry(attack, None);
        }
        self.send_logs();
        resolved
    }

    fn run_attack_phase(
        &mut self,
        attacks: &mut [AttackModel],
        attacker_hook: HookSelector<AttackModel>,
        defender_hook: HookSelector<AttackModel>,
    ) {
        for attack in attacks.iter_mut() {
            if let Some(player) = self.attacker_player(attack) {
                let ignore = attack.should_ignore.clone();
                self.call_hook_some(player, attacker_hook, attack, &|g: &GameState, owner: EntityId| {
                    ignore.iter().any(|p| p(g, owner))
                });
            }
        }
        for attack in attacks.iter_mut() {
            if let Some(player) = self.target_player(attack) {
                let ignore = attack.should_ignore.clone();
                self.call_hook_some(player, defender_hook, attack, &|g: &GameState, owner: EntityId| {
                    ignore.iter().any(|p| p(g, owner))
                });
            }
        }
    }

    fn resolve_attack(&mut self, attack: &mut AttackModel) {
        let Some(row) = attack.target() else {
            return;
        };
        let Some(current) = self.components.get::<RowComponent>(row).and_then(|r| r.health) else {
            return;
        };
        if self.hermit_in_row(row).is_none() {
            return;
        }

        if let Some(weakness) = self.weakness_attack(attack) {
            attack.add_next_attack(weakness);
        }

        let damage = attack.calculate_damage();
        let health = current.saturating_sub(damage).min(current);
        if let Some(r) = self.components.get_mut::<RowComponent>(row) {
            r.health = Some(health);
        }
        debug!(?row, damage, health, attack_type = ?attack.attack_type, "attack resolved");
    }

    fn weakness_attack(&self, attack: &AttackModel) -> Option<AttackModel> {
        if attack.create_weakness == WeaknessPolicy::Never {
            return None;
        }
        if f64::from(attack.damage()) * attack.multiplier() == 0.0 {
            return None;
        }

        let attacker_hermit = self.attacking_hermit(attack)?;
        let target_hermit = self.hermit_in_row(attack.target()?)?;

        if attack.create_weakness == WeaknessPolicy::IfWeak {
            let attacker_type = self.hermit_type_of(attacker_hermit)?;
            let target_type = self.hermit_type_of(target_hermit)?;
            if !attacker_type.is_strong_against(target_type) {
                return None;
            }
        }

        let mut weakness = AttackModel::new(AttackType::Weakness)
            .with_creator(attack.creator().unwrap_or(attacker_hermit))
            .with_attacker(attack.attacker())
            .with_target(attack.target())
            .with_log(|v| format!(" and dealt {} weakness damage to {}", v.damage, v.target));
        weakness.add_damage(Some(attacker_hermit), self.config.weakness_damage);
        Some(weakness)
    }

    // === Attack relations ===

    /// Player whose `*_attack` hooks run for this attack.
    ///
    /// Cards attack for their owner; status effects attack for the
    /// opponent of the target's owner.
    #[must_use]
    pub fn attacker_player(&self, attack: &AttackModel) -> Option<EntityId> {
        let attacker = attack.attacker()?;
        if let Some(card) = self.components.get::<CardComponent>(attacker) {
            return Some(card.player);
        }
        if self.components.contains::<StatusEffectComponent>(attacker) {
            return self.target_player(attack).and_then(|p| self.opponent_of(p));
        }
        None
    }

    /// Player whose `*_defence` hooks run for this attack.
    #[must_use]
    pub fn target_player(&self, attack: &AttackModel) -> Option<EntityId> {
        self.components
            .get::<RowComponent>(attack.target()?)
            .map(|r| r.player)
    }

    /// The hermit doing the attacking: the attacker itself if it is a
    /// hermit, otherwise the active hermit of the attacking card's owner.
    #[must_use]
    pub fn attacking_hermit(&self, attack: &AttackModel) -> Option<EntityId> {
        let attacker = attack.attacker()?;
        let card = self.components.get::<CardComponent>(attacker)?;
        if card.props().hermit().is_some() {
            return Some(attacker);
        }
        self.active_hermit(card.player)
    }

    /// Target hermit of an attack.
    #[must_use]
    pub fn target_hermit(&self, attack: &AttackModel) -> Option<EntityId> {
        self.hermit_in_row(attack.target()?)
    }

    /// Whether the attack targets the row holding `card`.
    #[must_use]
    pub fn is_targeting(&self, attack: &AttackModel, card: EntityId) -> bool {
        attack.target().is_some() && attack.target() == self.row_of_card(card)
    }
}

/// Build a hermit's primary or secondary attack against the opponent's
/// active row.
#[must_use]
pub fn hermit_attack(game: &GameState, card: EntityId, kind: HermitAttackType) -> Option<AttackModel> {
    let component = game.components.get::<CardComponent>(card)?;
    let hermit = component.props().hermit()?;
    let target = game
        .opponent_of(component.player)
        .and_then(|opponent| game.active_row_of(opponent));

    let mut attack = AttackModel::new(kind.into())
        .with_creator(card)
        .with_attacker(Some(card))
        .with_target(target)
        .with_weakness(WeaknessPolicy::IfWeak)
        .with_log(|v| {
            let flip = if v.coin_flip.is_empty() {
                String::new()
            } else {
                format!("{}, then ", v.coin_flip)
            };
            format!("{} {}attacked {} with {} for {} damage", v.attacker, flip, v.target, v.attack_name, v.damage)
        });
    attack.add_damage(Some(card), hermit.attack(kind).damage);
    Some(attack)
}
