//! The binary frame layout.
//!
//! Every frame is `opcode (1) | tenths of a second since the previous
//! action (2, BE) | payload`. Payload sizes are fixed per opcode except for
//! pick and modal answers, which carry a 2-byte BE length prefix.
//!
//! | opcode        | payload                                   |
//! |---------------|-------------------------------------------|
//! | `0x0`..`0x3`  | row, column code, hand index (1 byte each)|
//! | `0x4`..`0x9`  | none                                      |
//! | `0xA`         | row index (1)                             |
//! | `0xB`         | length + entity id as UTF-8 decimal       |
//! | `0xC`         | length + JSON modal result                |
//! | `0xD`, `0xE`  | none                                      |
//! | `0xF0`        | milliseconds (4, BE)                      |
//!
//! Column codes: item slots `0`..`2`, attach `3`, hermit `4`, single use
//! `5` (`6` is also read as single use).

use super::CodecError;
use crate::core::TurnAction;

pub const COLUMN_ATTACH: u8 = 3;
pub const COLUMN_HERMIT: u8 = 4;
pub const COLUMN_SINGLE_USE: u8 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    None,
    PlayCard { row: u8, column: u8, hand_index: u8 },
    Row(u8),
    /// Decimal entity id of the picked slot.
    Pick(String),
    /// JSON modal result.
    Modal(String),
    Delay(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub action: TurnAction,
    pub tenths: u16,
    pub payload: Payload,
}

/// Shape of the payload an opcode carries.
fn payload_shape(action: TurnAction) -> Shape {
    match action {
        TurnAction::PlayHermitCard
        | TurnAction::PlayItemCard
        | TurnAction::PlayEffectCard
        | TurnAction::PlaySingleUseCard => Shape::Fixed(3),
        TurnAction::ChangeActiveHermit => Shape::Fixed(1),
        TurnAction::PickRequest | TurnAction::ModalRequest => Shape::Variable,
        TurnAction::Delay => Shape::Fixed(4),
        _ => Shape::Fixed(0),
    }
}

enum Shape {
    Fixed(usize),
    Variable,
}

impl Frame {
    #[must_use]
    pub fn new(action: TurnAction, tenths: u16, payload: Payload) -> Self {
        Self { action, tenths, payload }
    }

    /// Append the encoded frame to `out`.
    ///
    /// Fails when the payload does not fit the opcode or a variable payload
    /// is longer than `u16::MAX` bytes.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let bad = |reason: &str| CodecError::BadPayload {
            action: self.action,
            reason: reason.to_string(),
        };
        out.push(self.action.opcode());
        out.extend_from_slice(&self.tenths.to_be_bytes());

        match (&self.payload, payload_shape(self.action)) {
            (Payload::None, Shape::Fixed(0)) => {}
            (
                Payload::PlayCard {
                    row,
                    column,
                    hand_index,
                },
                Shape::Fixed(3),
            ) => out.extend_from_slice(&[*row, *column, *hand_index]),
            (Payload::Row(row), Shape::Fixed(1)) => out.push(*row),
            (Payload::Delay(millis), Shape::Fixed(4)) => out.extend_from_slice(&millis.to_be_bytes()),
            (Payload::Pick(text) | Payload::Modal(text), Shape::Variable) => {
                let len = u16::try_from(text.len()).map_err(|_| bad("payload longer than 65535 bytes"))?;
                out.extend_from_slice(&len.to_be_bytes());
                out.extend_from_slice(text.as_bytes());
            }
            _ => return Err(bad("payload does not match the opcode")),
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(8);
        self.encode(&mut out)?;
        Ok(out)
    }

    /// Milliseconds since the previous action, at tenth-of-a-second
    /// resolution.
    #[must_use]
    pub fn millis_since_last(&self) -> u64 {
        u64::from(self.tenths) * 100
    }
}

/// Bounds-checked reads over a frame buffer.
struct Reader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self.cursor.checked_add(n).filter(|&end| end <= self.bytes.len());
        let Some(end) = end else {
            return Err(CodecError::Truncated { offset: self.cursor });
        };
        let out = &self.bytes[self.cursor..end];
        self.cursor = end;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, CodecError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Decode one frame from the start of `bytes`. Returns the frame and the
/// number of bytes it used.
pub fn decode_frame(bytes: &[u8]) -> Result<(Frame, usize), CodecError> {
    let mut r = Reader { bytes, cursor: 0 };
    let opcode = r.u8()?;
    let action = TurnAction::from_opcode(opcode).ok_or(CodecError::UnknownOpcode(opcode))?;
    let tenths = r.u16()?;

    let payload = match payload_shape(action) {
        Shape::Fixed(0) => Payload::None,
        Shape::Fixed(1) => Payload::Row(r.u8()?),
        Shape::Fixed(4) => Payload::Delay(r.u32()?),
        Shape::Fixed(_) => Payload::PlayCard {
            row: r.u8()?,
            column: r.u8()?,
            hand_index: r.u8()?,
        },
        Shape::Variable => {
            let len = usize::from(r.u16()?);
            let text = std::str::from_utf8(r.take(len)?)
                .map_err(|_| CodecError::BadPayload {
                    action,
                    reason: "payload is not UTF-8".to_string(),
                })?
                .to_string();
            if action == TurnAction::PickRequest {
                Payload::Pick(text)
            } else {
                Payload::Modal(text)
            }
        }
    };
    Ok((Frame { action, tenths, payload }, r.cursor))
}

/// Decode frames until the buffer ends or a frame fails. Returns every
/// frame decoded before the failure together with the error.
#[must_use]
pub fn decode_frames(bytes: &[u8]) -> (Vec<Frame>, Option<CodecError>) {
    let mut frames = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        match decode_frame(&bytes[offset..]) {
            Ok((frame, used)) => {
                frames.push(frame);
                offset += used;
            }
            Err(err) => return (frames, Some(err.at_offset(offset))),
        }
    }
    (frames, None)
}
