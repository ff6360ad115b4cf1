//! Core engine types: entities, seats, state, turn actions, RNG and
//! configuration.

pub mod action;
pub mod config;
pub mod entity;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{TurnAction, TurnActionData};
pub use config::{DebugConfig, DeckLimits, GameConfig};
pub use entity::EntityId;
pub use player::{PlayerId, PlayerMap, SEAT_COUNT};
pub use rng::GameRng;
pub use state::{GameOutcome, GameState, TurnState, WinReason};
