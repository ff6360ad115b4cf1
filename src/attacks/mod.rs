//! Attacks: the damage ledger and the resolution pipeline.
//!
//! - `model`: `AttackModel`, its history and log values
//! - `pipeline`: `GameState::execute_attacks` and attack relations

pub mod model;
pub mod pipeline;

pub use model::{
    AttackChange, AttackHistory, AttackLogFn, AttackLogValues, AttackModel, AttackRequest,
    AttackType, IgnorePredicate, WeaknessPolicy,
};
pub use pipeline::{hermit_attack, GAME_SOURCE};
