//! Status effects: modifiers bound to one card or player.
//!
//! An effect is a [`StatusEffectComponent`] plus an observer. Built-in
//! behaviors subscribe hooks through that observer in `on_apply`, so
//! removing the effect tears every hook down with it.
//!
//! ## Lifecycle
//!
//! `apply_status_effect` creates the component, initialises the counter and
//! calls `on_apply`. `remove_status_effect` calls `on_remove`, destroys the
//! observer and deletes the component. Damage effects (burn, poison) are
//! exclusive: a target has at most one.

mod damage;
mod disabled;
mod smelting;

pub use damage::{Burn, Poison};
pub use disabled::{PrimaryAttackDisabled, SecondaryAttackDisabled};
pub use smelting::Smelting;

use std::sync::Arc;

use tracing::debug;

use crate::components::{CardComponent, PlayerComponent, StatusEffectComponent, StatusEffectTarget};
use crate::core::{EntityId, GameState};

/// Static data of one status effect type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusEffectProps {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Burn and poison; a target carries at most one.
    pub damage_effect: bool,
    /// Starting value for counter effects.
    pub counter: Option<u32>,
}

/// Behavior of a status effect type.
///
/// Both callbacks default to doing nothing.
pub trait StatusEffect: Send + Sync {
    fn props(&self) -> &StatusEffectProps;

    /// Install hooks through `observer`.
    fn on_apply(&self, _game: &mut GameState, _effect: EntityId, _target: StatusEffectTarget, _observer: EntityId) {}

    /// Undo anything not covered by observer teardown.
    fn on_remove(&self, _game: &mut GameState, _effect: EntityId, _target: StatusEffectTarget, _observer: EntityId) {}
}

/// Every built-in status effect.
#[must_use]
pub fn builtin() -> Vec<Arc<dyn StatusEffect>> {
    vec![
        Arc::new(Burn),
        Arc::new(Poison),
        Arc::new(Smelting),
        Arc::new(PrimaryAttackDisabled),
        Arc::new(SecondaryAttackDisabled),
    ]
}

impl GameState {
    /// Apply an effect by id. Returns the effect entity, or `None` when the
    /// id is unknown, the target is gone, or a damage effect is already on
    /// the target.
    pub fn apply_status_effect(
        &mut self,
        id: &str,
        target: StatusEffectTarget,
        creator: Option<EntityId>,
    ) -> Option<EntityId> {
        let effect = self.registry.status_effect(id)?;
        let target_alive = match target {
            StatusEffectTarget::Card(c) => self.components.contains::<CardComponent>(c),
            StatusEffectTarget::Player(p) => self.components.contains::<PlayerComponent>(p),
        };
        if !target_alive {
            return None;
        }
        if effect.props().damage_effect && self.has_damage_effect(target.entity()) {
            debug!(id, target = %target.entity(), "damage effect already present");
            return None;
        }

        let entity = self.components.allocate();
        let observer = self.new_observer(entity);
        self.components.insert(StatusEffectComponent {
            entity,
            effect: Arc::clone(&effect),
            target,
            counter: effect.props().counter,
            creator,
            observer,
        });
        debug!(id, %entity, target = %target.entity(), "status effect applied");
        effect.on_apply(self, entity, target, observer);
        Some(entity)
    }

    /// Remove an effect. Idempotent.
    pub fn remove_status_effect(&mut self, effect: EntityId) {
        let Some(component) = self.components.get::<StatusEffectComponent>(effect).cloned() else {
            return;
        };
        // Deleted first so a re-entrant remove from on_remove is a no-op.
        self.components.delete(effect);
        component
            .effect
            .on_remove(self, effect, component.target, component.observer);
        self.destroy_observer(component.observer);
        debug!(id = component.id(), %effect, "status effect removed");
    }

    /// Effects bound to a card or player, in creation order.
    #[must_use]
    pub fn status_effects_on(&self, target: EntityId) -> Vec<EntityId> {
        self.components
            .iter::<StatusEffectComponent>()
            .filter(|e| e.target.entity() == target)
            .map(|e| e.entity)
            .collect()
    }

    #[must_use]
    pub fn has_status_effect(&self, target: EntityId, id: &str) -> bool {
        self.components
            .iter::<StatusEffectComponent>()
            .any(|e| e.target.entity() == target && e.id() == id)
    }

    #[must_use]
    pub fn has_damage_effect(&self, target: EntityId) -> bool {
        self.components
            .iter::<StatusEffectComponent>()
            .any(|e| e.target.entity() == target && e.props().damage_effect)
    }

    /// Remove every effect bound to `target`.
    pub fn remove_status_effects_on(&mut self, target: EntityId) {
        for effect in self.status_effects_on(target) {
            self.remove_status_effect(effect);
        }
    }

    /// Decrement an effect's counter. Returns the new value.
    pub fn tick_status_effect(&mut self, effect: EntityId) -> Option<u32> {
        let component = self.components.get_mut::<StatusEffectComponent>(effect)?;
        let next = component.counter?.saturating_sub(1);
        component.counter = Some(next);
        Some(next)
    }
}
