//! Entity/component store.
//!
//! Entities are bare ids; what an entity *is* depends on which tables hold
//! a component for it:
//!
//! - `PlayerComponent`: a seat, its piles, lives and hook table
//! - `CardComponent`: a card instance and where it sits
//! - `SlotComponent` / `RowComponent`: board positions and row health
//! - `ObserverComponent`: a hook subscription scope
//! - `StatusEffectComponent`: an effect bound to a card or player
//!
//! Relations (card → slot → row → player) are entity ids, never references.

pub mod board;
pub mod card;
pub mod observer;
pub mod player;
pub mod status;
pub mod store;

pub use board::{RowComponent, SlotComponent, SlotKind};
pub use card::CardComponent;
pub use observer::{ObserverComponent, Subscription};
pub use player::{CoinFlip, CoinFlipRecord, PlayerComponent};
pub use status::{StatusEffectComponent, StatusEffectTarget};
pub use store::{Component, ComponentStore};
