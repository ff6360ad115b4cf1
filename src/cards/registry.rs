//! Card and status-effect lookup.
//!
//! The `CardRegistry` maps card ids to shared behavior values and is
//! read-only once a game starts, so one `Arc<CardRegistry>` can back any
//! number of games on any number of threads.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::card::Card;
use super::catalogue;
use crate::status_effects::{self, StatusEffect};

/// Registry of card and status-effect types.
///
/// ```
/// use hc_engine::cards::CardRegistry;
///
/// let registry = CardRegistry::with_builtin();
/// let sword = registry.get("iron_sword").unwrap();
/// assert_eq!(sword.props().name, "Iron Sword");
/// assert!(registry.status_effect("fire").is_some());
/// ```
#[derive(Clone, Default)]
pub struct CardRegistry {
    cards: FxHashMap<&'static str, Arc<dyn Card>>,
    by_numeric: FxHashMap<u16, &'static str>,
    status_effects: FxHashMap<&'static str, Arc<dyn StatusEffect>>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in card and status effect.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for card in catalogue::all() {
            registry.register(card);
        }
        for effect in status_effects::builtin() {
            registry.register_status_effect(effect);
        }
        registry
    }

    /// Register a card type, replacing any card with the same id.
    pub fn register(&mut self, card: Arc<dyn Card>) {
        let props = card.props();
        self.by_numeric.insert(props.numeric_id, props.id);
        self.cards.insert(props.id, card);
    }

    pub fn register_status_effect(&mut self, effect: Arc<dyn StatusEffect>) {
        self.status_effects.insert(effect.props().id, effect);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn Card>> {
        self.cards.get(id).cloned()
    }

    #[must_use]
    pub fn get_numeric(&self, numeric_id: u16) -> Option<Arc<dyn Card>> {
        self.by_numeric.get(&numeric_id).and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn status_effect(&self, id: &str) -> Option<Arc<dyn StatusEffect>> {
        self.status_effects.get(id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Every card type, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Card>> {
        self.cards.values()
    }
}

impl fmt::Debug for CardRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardRegistry")
            .field("cards", &self.cards.len())
            .field("status_effects", &self.status_effects.len())
            .finish()
    }
}
