//! Per-player hook tables.
//!
//! Card behaviors extend the game by subscribing callbacks into named hooks
//! of a player (`before_attack`, `on_turn_end`, ...). Every subscription is
//! made through an observer, so when the card leaves play all of its
//! callbacks disappear together.
//!
//! ## Dispatch rules
//!
//! - Callbacks run in subscription order.
//! - Dispatch iterates over a snapshot; entries added during dispatch wait
//!   for the next call, entries removed during dispatch are skipped.
//! - `subscribe_once` entries are removed just before their first call.
//! - `call_hook_some` skips entries whose owner matches an ignore predicate.
//!
//! ```
//! use hc_engine::hooks::{hook, Hook, PlayerHooks};
//!
//! let mut hooks = PlayerHooks::default();
//! assert!(hook::on_turn_start(&mut hooks).is_empty());
//! let _: &mut Hook<()> = hook::on_turn_end(&mut hooks);
//! ```

mod dispatch;

pub use dispatch::HookSelector;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::attacks::{AttackModel, AttackRequest};
use crate::cards::EnergyType;
use crate::components::{CoinFlip, SlotComponent};
use crate::core::{EntityId, GameState};
use crate::query::Query;

/// Identifies one subscription across all hooks of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Callback stored in a hook.
pub type HookFn<A, R> = Arc<dyn Fn(&mut GameState, &mut A) -> R + Send + Sync>;

/// One subscribed callback.
pub struct HookEntry<A: 'static, R: 'static> {
    pub id: SubscriptionId,
    pub observer: EntityId,
    /// Entity the observer wraps; this is what ignore predicates test.
    pub owner: EntityId,
    pub once: bool,
    pub callback: HookFn<A, R>,
}

impl<A: 'static, R: 'static> Clone for HookEntry<A, R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            observer: self.observer,
            owner: self.owner,
            once: self.once,
            callback: Arc::clone(&self.callback),
        }
    }
}

/// An ordered list of callbacks taking `&mut A` and returning `R`.
pub struct Hook<A: 'static, R: 'static = ()> {
    entries: Vec<HookEntry<A, R>>,
}

impl<A: 'static, R: 'static> Hook<A, R> {
    pub fn push(&mut self, entry: HookEntry<A, R>) {
        self.entries.push(entry);
    }

    /// Remove one subscription. Returns whether it was present.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove every callback installed by `observer`.
    pub fn remove_observer(&mut self, observer: EntityId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.observer != observer);
        before - self.entries.len()
    }

    #[must_use]
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    #[must_use]
    pub fn has_observer(&self, observer: EntityId) -> bool {
        self.entries.iter().any(|e| e.observer == observer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the current entries, used for dispatch.
    #[must_use]
    pub fn snapshot(&self) -> Vec<HookEntry<A, R>> {
        self.entries.clone()
    }
}

impl<A: 'static, R: 'static> Default for Hook<A, R> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<A: 'static, R: 'static> Clone for Hook<A, R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<A: 'static, R: 'static> fmt::Debug for Hook<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.id.0, e.observer.0)))
            .finish()
    }
}

// === Hook arguments ===

/// A coin flip about to be recorded. Hooks may change the outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinFlipEvent {
    pub card: EntityId,
    pub tosses: SmallVec<[CoinFlip; 4]>,
}

/// The active row of a player changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveRowChange {
    pub old: Option<EntityId>,
    pub new: Option<EntityId>,
}

macro_rules! player_hooks {
    ($($(#[$doc:meta])* $name:ident: $args:ty => $ret:ty,)*) => {
        /// Every hook of one player.
        #[derive(Clone, Debug, Default)]
        pub struct PlayerHooks {
            $($(#[$doc])* pub $name: Hook<$args, $ret>,)*
        }

        impl PlayerHooks {
            /// Remove one subscription from whichever hook holds it.
            pub fn remove(&mut self, id: SubscriptionId) -> bool {
                let mut removed = false;
                $(removed |= self.$name.remove(id);)*
                removed
            }

            /// Whether any hook holds this subscription.
            #[must_use]
            pub fn contains(&self, id: SubscriptionId) -> bool {
                false $(|| self.$name.contains(id))*
            }

            /// Remove every callback an observer installed.
            pub fn remove_observer(&mut self, observer: EntityId) -> usize {
                0 $(+ self.$name.remove_observer(observer))*
            }

            /// Total number of subscriptions.
            #[must_use]
            pub fn len(&self) -> usize {
                0 $(+ self.$name.len())*
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }

        /// Hook selectors, passed to `subscribe` and `call_hook`.
        pub mod hook {
            use super::*;

            $(
                pub fn $name(hooks: &mut PlayerHooks) -> &mut Hook<$args, $ret> {
                    &mut hooks.$name
                }
            )*
        }
    };
}

player_hooks! {
    /// Attacker's side, before any damage modification phase.
    before_attack: AttackModel => (),
    /// Target's side, after `before_attack`.
    before_defence: AttackModel => (),
    on_attack: AttackModel => (),
    on_defence: AttackModel => (),
    /// Attacker's side, after damage has been applied.
    after_attack: AttackModel => (),
    after_defence: AttackModel => (),
    /// Contributes extra attacks (single-use weapons) to an attack action.
    get_attack: AttackRequest => Option<AttackModel>,
    on_turn_start: () => (),
    on_turn_end: () => (),
    /// A card of this player entered a board slot.
    on_attach: EntityId => (),
    /// A card of this player left a board slot.
    on_detach: EntityId => (),
    /// The single-use card was applied.
    on_apply: () => (),
    on_coin_flip: CoinFlipEvent => (),
    on_active_row_change: ActiveRowChange => (),
    /// Slots that cannot be played into.
    freeze_slots: () => Query<SlotComponent>,
    /// Any `true` prevents the player's active hermit from being knocked back.
    blocked_knockback: () => bool,
    /// Energy provided beyond the items in the active row.
    available_energy: Vec<EnergyType> => (),
}
