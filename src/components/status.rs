//! Status effect instances.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::status_effects::{StatusEffect, StatusEffectProps};

/// What a status effect is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "entity", rename_all = "snake_case")]
pub enum StatusEffectTarget {
    Card(EntityId),
    Player(EntityId),
}

impl StatusEffectTarget {
    #[must_use]
    pub fn entity(self) -> EntityId {
        match self {
            StatusEffectTarget::Card(e) | StatusEffectTarget::Player(e) => e,
        }
    }
}

#[derive(Clone)]
pub struct StatusEffectComponent {
    pub entity: EntityId,
    pub effect: Arc<dyn StatusEffect>,
    pub target: StatusEffectTarget,
    /// Remaining count for counter effects.
    pub counter: Option<u32>,
    /// Card that applied the effect, if any.
    pub creator: Option<EntityId>,
    pub observer: EntityId,
}

impl StatusEffectComponent {
    #[must_use]
    pub fn props(&self) -> &StatusEffectProps {
        self.effect.props()
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        self.effect.props().id
    }
}

impl fmt::Debug for StatusEffectComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusEffectComponent")
            .field("entity", &self.entity)
            .field("id", &self.id())
            .field("target", &self.target)
            .field("counter", &self.counter)
            .field("creator", &self.creator)
            .field("observer", &self.observer)
            .finish()
    }
}
