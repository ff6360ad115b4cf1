//! Turning actions into frames and back against a live game.
//!
//! Frames refer to slots by board position and to cards by hand index, so
//! both directions need the game as it was just before the action. Slots
//! always resolve on the acting player's side of the board.

use tracing::warn;

use super::frame::{Frame, Payload, COLUMN_ATTACH, COLUMN_HERMIT, COLUMN_SINGLE_USE};
use super::CodecError;
use crate::components::{RowComponent, SlotComponent, SlotKind};
use crate::core::{EntityId, GameState, TurnAction, TurnActionData};
use crate::requests::ModalResult;

impl GameState {
    /// Encode an action `player` is about to take.
    pub fn frame_for(&self, player: EntityId, data: &TurnActionData, elapsed_millis: u64) -> Result<Frame, CodecError> {
        let action = data.kind();
        let bad = |reason: &str| CodecError::BadPayload {
            action,
            reason: reason.to_string(),
        };
        let tenths = u16::try_from(elapsed_millis / 100).unwrap_or(u16::MAX);

        let payload = match data {
            TurnActionData::PlayHermitCard { card, slot }
            | TurnActionData::PlayItemCard { card, slot }
            | TurnActionData::PlayEffectCard { card, slot }
            | TurnActionData::PlaySingleUseCard { card, slot } => {
                let s = self.components.get::<SlotComponent>(*slot).ok_or_else(|| bad("unknown slot"))?;
                let (row, column) = self.slot_position(s).ok_or_else(|| bad("slot has no board position"))?;
                let hand_index = self
                    .player(player)
                    .and_then(|p| p.hand_index(*card))
                    .and_then(|i| u8::try_from(i).ok())
                    .ok_or_else(|| bad("card is not in hand"))?;
                Payload::PlayCard { row, column, hand_index }
            }
            TurnActionData::ChangeActiveHermit { slot } => {
                let row = self
                    .components
                    .get::<SlotComponent>(*slot)
                    .and_then(|s| s.row)
                    .and_then(|r| self.components.get::<RowComponent>(r))
                    .ok_or_else(|| bad("slot is not in a row"))?;
                Payload::Row(row.index)
            }
            TurnActionData::PickRequest { slot } => Payload::Pick(slot.raw().to_string()),
            TurnActionData::ModalRequest { result } => Payload::Modal(serde_json::to_string(result)?),
            TurnActionData::Delay { millis } => Payload::Delay(*millis),
            _ => Payload::None,
        };
        Ok(Frame::new(action, tenths, payload))
    }

    /// `(row index, column code)` of a slot. The single-use slot sits on
    /// row 0.
    fn slot_position(&self, slot: &SlotComponent) -> Option<(u8, u8)> {
        let column = match slot.kind {
            SlotKind::Item => slot.index,
            SlotKind::Attach => COLUMN_ATTACH,
            SlotKind::Hermit => COLUMN_HERMIT,
            SlotKind::SingleUse => return Some((0, COLUMN_SINGLE_USE)),
            SlotKind::Hand | SlotKind::Deck | SlotKind::Discard => return None,
        };
        let row = self.components.get::<RowComponent>(slot.row?)?;
        Some((row.index, column))
    }

    /// Rebuild the action a frame describes, as the acting player.
    pub fn action_from_frame(&self, frame: &Frame) -> Result<(EntityId, TurnActionData), CodecError> {
        let action = frame.action;
        let bad = |reason: &str| CodecError::BadPayload {
            action,
            reason: reason.to_string(),
        };
        let player = self.acting_player().ok_or_else(|| bad("nobody can act"))?;
        let p = self.player(player).ok_or_else(|| bad("acting player has no board"))?;
        let row_of = |index: u8| {
            p.rows
                .get(usize::from(index))
                .and_then(|&r| self.components.get::<RowComponent>(r))
                .ok_or_else(|| bad("row index out of range"))
        };

        let data = match (&frame.payload, action) {
            (Payload::PlayCard { row, column, hand_index }, kind) if kind.is_play_card() => {
                let slot = match *column {
                    c if c < COLUMN_ATTACH => *row_of(*row)?
                        .item_slots
                        .get(usize::from(c))
                        .ok_or_else(|| bad("item column out of range"))?,
                    COLUMN_ATTACH => row_of(*row)?.attach_slot,
                    COLUMN_HERMIT => row_of(*row)?.hermit_slot,
                    COLUMN_SINGLE_USE | 6 => p.single_use_slot,
                    _ => return Err(bad("unknown column code")),
                };
                let card = *p
                    .hand
                    .get(usize::from(*hand_index))
                    .ok_or_else(|| bad("hand index out of range"))?;
                TurnActionData::play_card(kind, card, slot).ok_or_else(|| bad("not a play action"))?
            }
            (Payload::Row(row), TurnAction::ChangeActiveHermit) => TurnActionData::ChangeActiveHermit {
                slot: row_of(*row)?.hermit_slot,
            },
            (Payload::Pick(text), TurnAction::PickRequest) => TurnActionData::PickRequest {
                slot: text.parse::<EntityId>().map_err(|_| bad("entity id is not a number"))?,
            },
            (Payload::Modal(json), TurnAction::ModalRequest) => TurnActionData::ModalRequest {
                result: serde_json::from_str::<ModalResult>(json)?,
            },
            (Payload::Delay(millis), TurnAction::Delay) => TurnActionData::Delay { millis: *millis },
            (Payload::None, kind) => TurnActionData::simple(kind).ok_or_else(|| bad("missing payload"))?,
            _ => return Err(bad("payload does not match the opcode")),
        };
        Ok((player, data))
    }

    /// Frame for the replay record, or `None` for actions that are not
    /// recorded (waiting) or cannot be encoded.
    pub(crate) fn encode_for_replay(&self, player: EntityId, data: &TurnActionData) -> Option<Frame> {
        if matches!(data, TurnActionData::WaitForTurn | TurnActionData::WaitForOpponentAction) {
            return None;
        }
        let elapsed = self.clock.now_millis().saturating_sub(self.last_action_at);
        match self.frame_for(player, data, elapsed) {
            Ok(frame) => Some(frame),
            Err(err) => {
                warn!(%err, "action left out of the replay");
                None
            }
        }
    }

    pub(crate) fn record_frame(&mut self, frame: &Frame) {
        match frame.to_bytes() {
            Ok(bytes) => self.replay.actions.extend_from_slice(&bytes),
            Err(err) => {
                warn!(%err, "action left out of the replay");
                return;
            }
        }
        self.last_action_at = self.clock.now_millis();
    }
}
