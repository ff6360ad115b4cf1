//! Observers: subscription scopes with typed per-attach state.
//!
//! An observer is created when a card is attached (or a status effect is
//! applied) and destroyed when it leaves. Every hook subscription made
//! through it is recorded here so teardown removes all of them at once.
//!
//! Behaviors that need memory across hook phases ("has this armor already
//! blocked damage this turn?") keep it in the observer's state rather than
//! in captured variables:
//!
//! ```
//! use hc_engine::components::ObserverComponent;
//! use hc_engine::core::EntityId;
//!
//! #[derive(Clone, Default)]
//! struct Blocked(u32);
//!
//! let mut observer = ObserverComponent::new(EntityId(3), EntityId(1));
//! assert!(observer.state::<Blocked>().is_none());
//! observer.set_state(Blocked(10));
//! assert_eq!(observer.state::<Blocked>().map(|b| b.0), Some(10));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::core::EntityId;
use crate::hooks::SubscriptionId;

/// One hook subscription owned by an observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription {
    /// Player whose hook table holds the entry.
    pub player: EntityId,
    pub id: SubscriptionId,
}

#[derive(Clone)]
pub struct ObserverComponent {
    pub entity: EntityId,
    /// Entity this observer acts for (a card or a status effect).
    pub wrapping: EntityId,
    pub subscriptions: SmallVec<[Subscription; 8]>,
    state: Option<Arc<dyn Any + Send + Sync>>,
}

impl ObserverComponent {
    #[must_use]
    pub fn new(entity: EntityId, wrapping: EntityId) -> Self {
        Self {
            entity,
            wrapping,
            subscriptions: SmallVec::new(),
            state: None,
        }
    }

    /// Typed state, if some was set with this type.
    #[must_use]
    pub fn state<T: Any>(&self) -> Option<&T> {
        self.state.as_deref().and_then(|s| s.downcast_ref::<T>())
    }

    pub fn set_state<T: Any + Send + Sync>(&mut self, value: T) {
        self.state = Some(Arc::new(value));
    }

    pub fn clear_state(&mut self) {
        self.state = None;
    }
}

impl fmt::Debug for ObserverComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverComponent")
            .field("entity", &self.entity)
            .field("wrapping", &self.wrapping)
            .field("subscriptions", &self.subscriptions.len())
            .field("has_state", &self.state.is_some())
            .finish()
    }
}
