//! Engine errors.
//!
//! Rejected turn actions never mutate the game. Invariant violations stop
//! the game they happen in (see [`GameOutcome::Error`](crate::core::GameOutcome)).

use thiserror::Error;

use crate::core::{EntityId, PlayerId, TurnAction};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{action} is not available to {player}")]
    IllegalAction { action: TurnAction, player: EntityId },

    #[error("{0} is not a player of this game")]
    WrongPlayer(EntityId),

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("unknown card id `{0}`")]
    UnknownCard(String),

    #[error("invalid deck for the {seat}: {reason}")]
    InvalidDeck {
        seat: PlayerId,
        #[source]
        reason: DeckError,
    },

    #[error("engine invariant violated: {0}")]
    Invariant(String),

    #[error("the game is over")]
    GameOver,
}

/// Why a deck breaks the configured [`DeckLimits`](crate::core::DeckLimits).
/// Checked in declaration order, so the first variant found is the simplest
/// problem with the deck.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck must not include cards from the disabled `{expansion}` expansion ({card})")]
    DisabledExpansion { card: String, expansion: String },

    #[error("deck must have at least {min} hermit cards, found {found}")]
    TooFewHermits { min: usize, found: usize },

    #[error("deck can not have more than {max} hermit cards, found {found}")]
    TooManyHermits { max: usize, found: usize },

    #[error("cannot have more than {max} copies of `{card}` unless it is an item card")]
    TooManyDuplicates { card: String, max: usize },

    #[error("deck cannot have more than {max} ultra rare cards")]
    TooManyUltraRares { max: usize },

    #[error("deck cannot have more than {max} rare cards")]
    TooManyRares { max: usize },

    #[error("deck must have exactly {expected} cards, found {found}")]
    WrongSize { expected: usize, found: usize },

    #[error("deck must have at least {min} cards, found {found}")]
    TooFewCards { min: usize, found: usize },

    #[error("deck can not have more than {max} cards, found {found}")]
    TooManyCards { max: usize, found: usize },
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
