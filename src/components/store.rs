//! Typed component tables keyed by entity.
//!
//! Each component type has its own `im::OrdMap<EntityId, C>` table. Ordered
//! maps give deterministic iteration (ascending entity id, i.e. creation
//! order) and persistent maps make cloning a whole game O(1).

use im::OrdMap;

use super::{
    CardComponent, ObserverComponent, PlayerComponent, RowComponent, SlotComponent,
    StatusEffectComponent,
};
use crate::core::EntityId;

/// A value that can be stored in the [`ComponentStore`].
pub trait Component: Clone + 'static {
    /// The entity this component is registered against.
    fn entity(&self) -> EntityId;

    fn table(store: &ComponentStore) -> &OrdMap<EntityId, Self>;

    fn table_mut(store: &mut ComponentStore) -> &mut OrdMap<EntityId, Self>;
}

macro_rules! component_table {
    ($ty:ty, $field:ident) => {
        impl Component for $ty {
            fn entity(&self) -> EntityId {
                self.entity
            }

            fn table(store: &ComponentStore) -> &OrdMap<EntityId, Self> {
                &store.$field
            }

            fn table_mut(store: &mut ComponentStore) -> &mut OrdMap<EntityId, Self> {
                &mut store.$field
            }
        }
    };
}

component_table!(PlayerComponent, players);
component_table!(CardComponent, cards);
component_table!(SlotComponent, slots);
component_table!(RowComponent, rows);
component_table!(ObserverComponent, observers);
component_table!(StatusEffectComponent, status_effects);

/// Registry of every component in one game.
#[derive(Clone, Debug, Default)]
pub struct ComponentStore {
    next_id: u32,
    players: OrdMap<EntityId, PlayerComponent>,
    cards: OrdMap<EntityId, CardComponent>,
    slots: OrdMap<EntityId, SlotComponent>,
    rows: OrdMap<EntityId, RowComponent>,
    observers: OrdMap<EntityId, ObserverComponent>,
    status_effects: OrdMap<EntityId, StatusEffectComponent>,
}

impl ComponentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh entity id. Ids are never reused.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a component built from a freshly allocated entity.
    pub fn create<C: Component>(&mut self, build: impl FnOnce(EntityId) -> C) -> EntityId {
        let entity = self.allocate();
        C::table_mut(self).insert(entity, build(entity));
        entity
    }

    /// Insert or replace a component under its own entity.
    pub fn insert<C: Component>(&mut self, component: C) {
        C::table_mut(self).insert(component.entity(), component);
    }

    #[must_use]
    pub fn get<C: Component>(&self, entity: EntityId) -> Option<&C> {
        C::table(self).get(&entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: EntityId) -> Option<&mut C> {
        C::table_mut(self).get_mut(&entity)
    }

    #[must_use]
    pub fn contains<C: Component>(&self, entity: EntityId) -> bool {
        C::table(self).contains_key(&entity)
    }

    /// All components of one type in entity order.
    pub fn iter<C: Component>(&self) -> impl Iterator<Item = &C> {
        C::table(self).values()
    }

    /// Remove one component type from an entity.
    pub fn remove<C: Component>(&mut self, entity: EntityId) -> Option<C> {
        C::table_mut(self).remove(&entity)
    }

    /// Remove the entity from every table that holds it. Returns whether
    /// anything was removed.
    pub fn delete(&mut self, entity: EntityId) -> bool {
        let mut removed = false;
        removed |= take(&mut self.players, entity);
        removed |= take(&mut self.cards, entity);
        removed |= take(&mut self.slots, entity);
        removed |= take(&mut self.rows, entity);
        removed |= take(&mut self.observers, entity);
        removed |= take(&mut self.status_effects, entity);
        removed
    }

    /// Number of entities ever allocated.
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next_id
    }
}

fn take<C: Clone>(table: &mut OrdMap<EntityId, C>, entity: EntityId) -> bool {
    if !table.contains_key(&entity) {
        return false;
    }
    table.remove(&entity).is_some()
}
