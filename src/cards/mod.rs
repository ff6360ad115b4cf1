//! Cards: static props, the behavior contract, the registry and the
//! built-in catalogue.
//!
//! ## Key Types
//!
//! - `CardProps`: immutable data of a card type
//! - `Card`: behavior of a card type, shared by every instance
//! - `CardRegistry`: id lookup for cards and status effects

pub mod card;
pub mod catalogue;
pub mod definition;
pub mod registry;

pub use card::{default_attach_condition, default_play_log, single_use_log, Card, PlainCard};
pub use definition::{
    CardCategory, CardKind, CardProps, EnergyType, HermitAttack, HermitAttackType, HermitProps, HermitType,
    ItemProps, Rarity, SingleUseProps,
};
pub use registry::CardRegistry;
