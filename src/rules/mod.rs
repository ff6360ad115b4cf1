//! The rules engine.
//!
//! Everything that turns a submitted [`TurnActionData`](crate::core::TurnActionData)
//! into state changes:
//! - `setup`: dealing decks and starting the first turn
//! - `deck`: deck-building limits checked at setup
//! - `actions`: which actions a player may take right now
//! - `turn`: applying actions, turn ends, knockouts and the outcome
//! - `board`: card movement and the primitives cards call into
//! - `energy`: item energy and attack costs

mod actions;
mod board;
mod deck;
mod energy;
mod setup;
mod turn;

pub use actions::play_action_for;
pub use deck::validate_deck;
pub use energy::has_enough_energy;
pub use setup::GameBuilder;
