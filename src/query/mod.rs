//! Composable predicates over components.
//!
//! A [`Query<C>`] is a pure predicate `(game, component) -> bool`. Field
//! predicates live in the [`slot`], [`row`] and [`card`] submodules and are
//! combined with [`every`], [`some`], [`not`] and [`exists`]:
//!
//! ```
//! use hc_engine::query::{self, slot};
//!
//! // An empty hermit slot on the opponent's side, not in the active row.
//! let target = query::every([
//!     slot::opponent(),
//!     slot::hermit(),
//!     slot::empty(),
//!     query::not(slot::active()),
//! ]);
//! # let _ = target;
//! ```
//!
//! Lookups run against a [`GameState`] with `find`, `filter` and `exists`.
//! `find` returning `None` is an ordinary outcome, not an error.

pub mod card;
pub mod row;
pub mod slot;

use std::fmt;
use std::sync::Arc;

use crate::components::Component;
use crate::core::GameState;

type Predicate<C> = dyn Fn(&GameState, &C) -> bool + Send + Sync;

/// A predicate over components of type `C`.
pub struct Query<C: 'static>(Arc<Predicate<C>>);

impl<C: 'static> Query<C> {
    pub fn new(f: impl Fn(&GameState, &C) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn matches(&self, game: &GameState, value: &C) -> bool {
        (self.0)(game, value)
    }

    /// Both this and `other`.
    #[must_use]
    pub fn and(self, other: Query<C>) -> Self {
        every([self, other])
    }
}

impl<C: 'static> Clone for Query<C> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<C: 'static> fmt::Debug for Query<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Query<{}>", std::any::type_name::<C>())
    }
}

// === Combinators ===

/// Matches everything.
#[must_use]
pub fn anything<C: 'static>() -> Query<C> {
    Query::new(|_, _| true)
}

/// Matches nothing.
#[must_use]
pub fn nothing<C: 'static>() -> Query<C> {
    Query::new(|_, _| false)
}

/// All of the queries match. An empty list matches everything.
pub fn every<C: 'static>(queries: impl IntoIterator<Item = Query<C>>) -> Query<C> {
    let queries: Vec<_> = queries.into_iter().collect();
    Query::new(move |game, value| queries.iter().all(|q| q.matches(game, value)))
}

/// At least one of the queries matches. An empty list matches nothing.
pub fn some<C: 'static>(queries: impl IntoIterator<Item = Query<C>>) -> Query<C> {
    let queries: Vec<_> = queries.into_iter().collect();
    Query::new(move |game, value| queries.iter().any(|q| q.matches(game, value)))
}

#[must_use]
pub fn not<C: 'static>(query: Query<C>) -> Query<C> {
    Query::new(move |game, value| !query.matches(game, value))
}

/// Matches when any component of type `T` satisfies `query`, regardless of
/// the subject being tested.
#[must_use]
pub fn exists<C: 'static, T: Component>(query: Query<T>) -> Query<C> {
    Query::new(move |game, _| game.exists(&query))
}

// === Lookups ===

impl GameState {
    /// First component (in entity order) matching the query.
    #[must_use]
    pub fn find<C: Component>(&self, query: &Query<C>) -> Option<&C> {
        self.components
            .iter::<C>()
            .find(|c| query.matches(self, c))
    }

    /// All components matching the query, in entity order.
    #[must_use]
    pub fn filter<C: Component>(&self, query: &Query<C>) -> Vec<&C> {
        self.components
            .iter::<C>()
            .filter(|c| query.matches(self, c))
            .collect()
    }

    #[must_use]
    pub fn exists<C: Component>(&self, query: &Query<C>) -> bool {
        self.find(query).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::SlotComponent;
    use crate::test_support::two_player_game;

    #[test]
    fn test_every_and_some_identities() {
        let game = two_player_game();
        assert_eq!(
            game.filter(&every::<SlotComponent>([])).len(),
            game.components.iter::<SlotComponent>().count()
        );
        assert!(game.find(&some::<SlotComponent>([])).is_none());
    }

    #[test]
    fn test_not_inverts() {
        let game = two_player_game();
        let hermits = game.filter(&slot::hermit()).len();
        let others = game.filter(&not(slot::hermit())).len();
        assert_eq!(hermits + others, game.components.iter::<SlotComponent>().count());
    }

    #[test]
    fn test_exists_ignores_subject() {
        let game = two_player_game();
        let always = exists::<SlotComponent, SlotComponent>(slot::hermit());
        let never = exists::<SlotComponent, SlotComponent>(nothing());
        assert_eq!(game.filter(&always).len(), game.components.iter::<SlotComponent>().count());
        assert!(game.filter(&never).is_empty());
    }

    #[test]
    fn test_find_returns_first_in_entity_order() {
        let game = two_player_game();
        let first = game.find(&slot::hermit()).map(|s| s.entity);
        let all: Vec<_> = game.filter(&slot::hermit()).iter().map(|s| s.entity).collect();
        assert_eq!(first, all.first().copied());
    }
}
