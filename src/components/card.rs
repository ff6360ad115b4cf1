//! Card instances.

use std::fmt;
use std::sync::Arc;

use crate::cards::{Card, CardCategory, CardProps};
use crate::core::EntityId;

/// A card in the game.
///
/// The behavior (and static props) are shared through the registry's
/// `Arc<dyn Card>`; everything else is per-instance runtime state.
#[derive(Clone)]
pub struct CardComponent {
    pub entity: EntityId,
    pub card: Arc<dyn Card>,
    /// Owning player entity.
    pub player: EntityId,
    /// Current slot. Discarding is a move to the discard pile slot.
    pub slot: EntityId,
    pub turned_over: bool,
    /// Whether effects may return this card from the discard pile.
    pub can_be_recovered: bool,
    /// Observer created on attach, present only while on a board slot.
    pub observer: Option<EntityId>,
}

impl CardComponent {
    #[must_use]
    pub fn props(&self) -> &CardProps {
        self.card.props()
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        self.card.props().id
    }

    #[must_use]
    pub fn category(&self) -> CardCategory {
        self.card.props().category()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.observer.is_some()
    }
}

impl fmt::Debug for CardComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardComponent")
            .field("entity", &self.entity)
            .field("id", &self.id())
            .field("player", &self.player)
            .field("slot", &self.slot)
            .field("turned_over", &self.turned_over)
            .field("observer", &self.observer)
            .finish()
    }
}
