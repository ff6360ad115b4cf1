//! Replays: the binary turn-action codec and the replay record.
//!
//! A game is fully determined by its seed, player names, decks and
//! configuration plus the ordered actions taken. [`ReplayRecord`] stores
//! exactly that, with the actions packed into frames (see [`frame`]), and
//! [`replay_game`] plays a record back.
//!
//! Decoding needs the game: play-card frames name cards by hand index and
//! slots by board position, both relative to the state at that moment. So
//! frames are decoded one at a time, each against the game as the previous
//! action left it.

mod codec;
pub mod frame;

pub use frame::{decode_frame, decode_frames, Frame, Payload};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cards::CardRegistry;
use crate::core::{GameConfig, GameState, PlayerId, TurnAction};
use crate::error::EngineError;
use crate::log::ManualClock;
use crate::rules::GameBuilder;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    #[error("frame truncated at byte {offset}")]
    Truncated { offset: usize },

    #[error("bad {action} payload: {reason}")]
    BadPayload { action: TurnAction, reason: String },

    #[error("modal result JSON: {0}")]
    Json(String),

    #[error("replayed {action} was rejected: {reason}")]
    Rejected { action: TurnAction, reason: String },

    #[error("replay record: {0}")]
    Record(String),
}

impl CodecError {
    /// Shift a frame-relative truncation offset to the whole buffer.
    #[must_use]
    pub(crate) fn at_offset(self, base: usize) -> Self {
        match self {
            CodecError::Truncated { offset } => CodecError::Truncated { offset: base + offset },
            other => other,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Json(err.to_string())
    }
}

impl From<bincode::Error> for CodecError {
    fn from(err: bincode::Error) -> Self {
        CodecError::Record(err.to_string())
    }
}

/// Everything needed to replay a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub seed: u64,
    pub names: [String; 2],
    /// Deck lists as submitted, before shuffling.
    pub decks: [Vec<String>; 2],
    pub config: GameConfig,
    /// Encoded frames, in order.
    pub actions: Vec<u8>,
}

impl ReplayRecord {
    #[must_use]
    pub fn new(seed: u64, names: [String; 2], config: GameConfig) -> Self {
        Self {
            seed,
            names,
            decks: [Vec::new(), Vec::new()],
            config,
            actions: Vec::new(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl GameState {
    /// The replay record of this game so far.
    #[must_use]
    pub fn replay_record(&self) -> &ReplayRecord {
        &self.replay
    }
}

/// A replayed game and how far the replay got.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub game: GameState,
    /// Frames applied successfully, in order.
    pub frames: Vec<Frame>,
    /// Why the replay stopped early, if it did.
    pub error: Option<CodecError>,
}

/// Rebuild a game from its record and re-apply every recorded action.
///
/// Stops at the first frame that fails to decode or whose action the game
/// rejects; everything applied before that is kept.
pub fn replay_game(record: &ReplayRecord, registry: Arc<CardRegistry>) -> Result<ReplayOutcome, EngineError> {
    // Frame times are replayed on a manual clock so the rebuilt record
    // matches the original byte for byte.
    let clock = Arc::new(ManualClock::new(0));
    let [first, second] = record.names.clone();
    let [first_deck, second_deck] = record.decks.clone();
    let mut game = GameBuilder::new(registry)
        .with_config(record.config.clone())
        .with_seed(record.seed)
        .with_clock(clock.clone())
        .with_player(PlayerId::FIRST, first, first_deck)
        .with_player(PlayerId::SECOND, second, second_deck)
        .build()?;

    let mut frames = Vec::new();
    let mut bytes = record.actions.as_slice();
    let mut offset = 0;
    while !bytes.is_empty() {
        let (frame, used) = match decode_frame(bytes) {
            Ok(decoded) => decoded,
            Err(err) => return Ok(stopped(game, frames, err.at_offset(offset))),
        };
        clock.advance(frame.millis_since_last());

        let (player, data) = match game.action_from_frame(&frame) {
            Ok(decoded) => decoded,
            Err(err) => return Ok(stopped(game, frames, err)),
        };
        match game.apply_turn_action(player, data) {
            Ok(result) if result.is_success() => {}
            Ok(result) => {
                let err = CodecError::Rejected {
                    action: frame.action,
                    reason: format!("{result:?}"),
                };
                return Ok(stopped(game, frames, err));
            }
            Err(err) => {
                let err = CodecError::Rejected {
                    action: frame.action,
                    reason: err.to_string(),
                };
                return Ok(stopped(game, frames, err));
            }
        }
        debug!(action = %frame.action, "replayed action");
        frames.push(frame);
        bytes = &bytes[used..];
        offset += used;
    }

    Ok(ReplayOutcome {
        game,
        frames,
        error: None,
    })
}

fn stopped(game: GameState, frames: Vec<Frame>, err: CodecError) -> ReplayOutcome {
    warn!(%err, applied = frames.len(), "replay stopped");
    ReplayOutcome {
        game,
        frames,
        error: Some(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trips_through_bincode() {
        let mut record = ReplayRecord::new(5, ["a".into(), "b".into()], GameConfig::default());
        record.decks[0] = vec!["ethoslab_common".into()];
        record.actions = vec![0x07, 0x00, 0x10];
        let bytes = record.to_bytes().unwrap();
        assert_eq!(ReplayRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_garbage_record_is_an_error() {
        assert!(matches!(ReplayRecord::from_bytes(&[1, 2, 3]), Err(CodecError::Record(_))));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CodecError::UnknownOpcode(0x42).to_string(), "unknown opcode 0x42");
        let err = CodecError::BadPayload {
            action: TurnAction::PickRequest,
            reason: "x".into(),
        };
        assert_eq!(err.to_string(), "bad PickRequest payload: x");
    }
}
