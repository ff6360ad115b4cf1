//! Subscribing to and calling hooks on a [`GameState`].

use std::sync::Arc;

use tracing::debug;

use super::{Hook, HookEntry, PlayerHooks, SubscriptionId};
use crate::components::{ObserverComponent, PlayerComponent, Subscription};
use crate::core::{EntityId, GameState};

/// Picks one hook out of a player's table, e.g. [`super::hook::on_attack`].
pub type HookSelector<A, R = ()> = fn(&mut PlayerHooks) -> &mut Hook<A, R>;

impl GameState {
    // === Observers ===

    /// Create an observer acting for `wrapping`.
    pub fn new_observer(&mut self, wrapping: EntityId) -> EntityId {
        self.components
            .create(|entity| ObserverComponent::new(entity, wrapping))
    }

    /// Remove all of an observer's subscriptions and delete it. Idempotent.
    pub fn destroy_observer(&mut self, observer: EntityId) {
        if !self.components.contains::<ObserverComponent>(observer) {
            return;
        }
        self.unsubscribe_all(observer);
        self.components.delete(observer);
    }

    /// Typed observer state, or the default when unset.
    #[must_use]
    pub fn observer_state<T: Clone + Default + Send + Sync + 'static>(&self, observer: EntityId) -> T {
        self.components
            .get::<ObserverComponent>(observer)
            .and_then(|o| o.state::<T>())
            .cloned()
            .unwrap_or_default()
    }

    /// Read-modify-write typed observer state. No-op if the observer is gone.
    pub fn update_observer_state<T, F>(&mut self, observer: EntityId, update: F)
    where
        T: Clone + Default + Send + Sync + 'static,
        F: FnOnce(&mut T),
    {
        let mut state = self.observer_state::<T>(observer);
        update(&mut state);
        if let Some(o) = self.components.get_mut::<ObserverComponent>(observer) {
            o.set_state(state);
        }
    }

    // === Subscription ===

    /// Append a callback to `player`'s hook, scoped to `observer`.
    ///
    /// Returns `None` if the observer or player no longer exists.
    pub fn subscribe<A: 'static, R: 'static>(
        &mut self,
        observer: EntityId,
        player: EntityId,
        hook: HookSelector<A, R>,
        callback: impl Fn(&mut GameState, &mut A) -> R + Send + Sync + 'static,
    ) -> Option<SubscriptionId> {
        self.subscribe_entry(observer, player, hook, Arc::new(callback), false)
    }

    /// Like [`subscribe`](Self::subscribe), removed just before its first call.
    pub fn subscribe_once<A: 'static, R: 'static>(
        &mut self,
        observer: EntityId,
        player: EntityId,
        hook: HookSelector<A, R>,
        callback: impl Fn(&mut GameState, &mut A) -> R + Send + Sync + 'static,
    ) -> Option<SubscriptionId> {
        self.subscribe_entry(observer, player, hook, Arc::new(callback), true)
    }

    fn subscribe_entry<A: 'static, R: 'static>(
        &mut self,
        observer: EntityId,
        player: EntityId,
        hook: HookSelector<A, R>,
        callback: super::HookFn<A, R>,
        once: bool,
    ) -> Option<SubscriptionId> {
        let owner = self.components.get::<ObserverComponent>(observer)?.wrapping;
        if !self.components.contains::<PlayerComponent>(player) {
            return None;
        }

        let id = self.next_subscription_id();
        let entry = HookEntry {
            id,
            observer,
            owner,
            once,
            callback,
        };
        let p = self.components.get_mut::<PlayerComponent>(player)?;
        hook(&mut p.hooks).push(entry);
        if let Some(o) = self.components.get_mut::<ObserverComponent>(observer) {
            o.subscriptions.push(Subscription { player, id });
        }
        Some(id)
    }

    /// Remove every callback `observer` installed in one hook of `player`.
    pub fn unsubscribe<A: 'static, R: 'static>(
        &mut self,
        observer: EntityId,
        player: EntityId,
        hook: HookSelector<A, R>,
    ) {
        if let Some(p) = self.components.get_mut::<PlayerComponent>(player) {
            hook(&mut p.hooks).remove_observer(observer);
        }
        self.prune_subscriptions(observer);
    }

    /// Remove every callback `observer` installed, in any hook of any player.
    pub fn unsubscribe_all(&mut self, observer: EntityId) {
        let subscriptions = match self.components.get_mut::<ObserverComponent>(observer) {
            Some(o) => std::mem::take(&mut o.subscriptions),
            None => return,
        };
        for sub in subscriptions {
            if let Some(p) = self.components.get_mut::<PlayerComponent>(sub.player) {
                p.hooks.remove(sub.id);
            }
        }
    }

    /// Drop bookkeeping for subscriptions that are no longer in any hook.
    fn prune_subscriptions(&mut self, observer: EntityId) {
        let subscriptions = match self.components.get::<ObserverComponent>(observer) {
            Some(o) => o.subscriptions.clone(),
            None => return,
        };
        let live: smallvec::SmallVec<[Subscription; 8]> = subscriptions
            .into_iter()
            .filter(|sub| self.is_subscribed(sub.player, sub.id))
            .collect();
        if let Some(o) = self.components.get_mut::<ObserverComponent>(observer) {
            o.subscriptions = live;
        }
    }

    fn is_subscribed(&self, player: EntityId, id: SubscriptionId) -> bool {
        self.components
            .get::<PlayerComponent>(player)
            .is_some_and(|p| p.hooks.contains(id))
    }

    // === Dispatch ===

    /// Call every callback of `player`'s hook in subscription order.
    pub fn call_hook<A: 'static, R: 'static>(
        &mut self,
        player: EntityId,
        hook: HookSelector<A, R>,
        args: &mut A,
    ) -> Vec<R> {
        self.dispatch(player, hook, args, None)
    }

    /// Like [`call_hook`](Self::call_hook), skipping callbacks whose owner
    /// matches `ignore`.
    pub fn call_hook_some<A: 'static, R: 'static>(
        &mut self,
        player: EntityId,
        hook: HookSelector<A, R>,
        args: &mut A,
        ignore: &dyn Fn(&GameState, EntityId) -> bool,
    ) -> Vec<R> {
        self.dispatch(player, hook, args, Some(ignore))
    }

    fn dispatch<A: 'static, R: 'static>(
        &mut self,
        player: EntityId,
        hook: HookSelector<A, R>,
        args: &mut A,
        ignore: Option<&dyn Fn(&GameState, EntityId) -> bool>,
    ) -> Vec<R> {
        let snapshot = match self.components.get_mut::<PlayerComponent>(player) {
            Some(p) => hook(&mut p.hooks).snapshot(),
            None => return Vec::new(),
        };

        let mut results = Vec::with_capacity(snapshot.len());
        for entry in snapshot {
            // Removed earlier in this dispatch (teardown or once).
            let live = self.is_subscribed(player, entry.id);
            if !live || !self.components.contains::<ObserverComponent>(entry.observer) {
                continue;
            }
            if ignore.is_some_and(|ignore| ignore(self, entry.owner)) {
                debug!(owner = %entry.owner, "hook entry ignored");
                continue;
            }
            if entry.once {
                if let Some(p) = self.components.get_mut::<PlayerComponent>(player) {
                    hook(&mut p.hooks).remove(entry.id);
                }
                self.prune_subscriptions(entry.observer);
            }
            results.push((entry.callback)(self, args));
        }
        results
    }
}
