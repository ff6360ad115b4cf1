//! Turn actions: what a player can submit to the engine.
//!
//! `TurnAction` is the bare kind of an action (used for legal-action sets,
//! completed/blocked bookkeeping and the replay opcode table).
//! `TurnActionData` is a submitted action with its payload.
//!
//! ```
//! use hc_engine::core::{EntityId, TurnAction, TurnActionData};
//!
//! let play = TurnActionData::PlayHermitCard { card: EntityId(40), slot: EntityId(12) };
//! assert_eq!(play.kind(), TurnAction::PlayHermitCard);
//! assert_eq!(TurnAction::from_opcode(play.kind().opcode()), Some(TurnAction::PlayHermitCard));
//! ```

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::requests::ModalResult;

/// Every kind of action a player can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnAction {
    PlayHermitCard,
    PlayItemCard,
    PlayEffectCard,
    PlaySingleUseCard,
    SingleUseAttack,
    PrimaryAttack,
    SecondaryAttack,
    EndTurn,
    ApplyEffect,
    RemoveEffect,
    ChangeActiveHermit,
    PickRequest,
    ModalRequest,
    WaitForTurn,
    WaitForOpponentAction,
    Delay,
}

impl TurnAction {
    pub const ALL: [TurnAction; 16] = [
        TurnAction::PlayHermitCard,
        TurnAction::PlayItemCard,
        TurnAction::PlayEffectCard,
        TurnAction::PlaySingleUseCard,
        TurnAction::SingleUseAttack,
        TurnAction::PrimaryAttack,
        TurnAction::SecondaryAttack,
        TurnAction::EndTurn,
        TurnAction::ApplyEffect,
        TurnAction::RemoveEffect,
        TurnAction::ChangeActiveHermit,
        TurnAction::PickRequest,
        TurnAction::ModalRequest,
        TurnAction::WaitForTurn,
        TurnAction::WaitForOpponentAction,
        TurnAction::Delay,
    ];

    pub const PLAY_CARD: [TurnAction; 4] = [
        TurnAction::PlayHermitCard,
        TurnAction::PlayItemCard,
        TurnAction::PlayEffectCard,
        TurnAction::PlaySingleUseCard,
    ];

    pub const ATTACKS: [TurnAction; 3] = [
        TurnAction::SingleUseAttack,
        TurnAction::PrimaryAttack,
        TurnAction::SecondaryAttack,
    ];

    /// Replay opcode for this kind.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        match self {
            TurnAction::PlayHermitCard => 0x0,
            TurnAction::PlayItemCard => 0x1,
            TurnAction::PlayEffectCard => 0x2,
            TurnAction::PlaySingleUseCard => 0x3,
            TurnAction::SingleUseAttack => 0x4,
            TurnAction::PrimaryAttack => 0x5,
            TurnAction::SecondaryAttack => 0x6,
            TurnAction::EndTurn => 0x7,
            TurnAction::ApplyEffect => 0x8,
            TurnAction::RemoveEffect => 0x9,
            TurnAction::ChangeActiveHermit => 0xA,
            TurnAction::PickRequest => 0xB,
            TurnAction::ModalRequest => 0xC,
            TurnAction::WaitForTurn => 0xD,
            TurnAction::WaitForOpponentAction => 0xE,
            TurnAction::Delay => 0xF0,
        }
    }

    #[must_use]
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.opcode() == opcode)
    }

    #[must_use]
    pub fn is_play_card(self) -> bool {
        Self::PLAY_CARD.contains(&self)
    }

    #[must_use]
    pub fn is_attack(self) -> bool {
        Self::ATTACKS.contains(&self)
    }
}

impl std::fmt::Display for TurnAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A submitted action and its payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnActionData {
    PlayHermitCard { card: EntityId, slot: EntityId },
    PlayItemCard { card: EntityId, slot: EntityId },
    PlayEffectCard { card: EntityId, slot: EntityId },
    PlaySingleUseCard { card: EntityId, slot: EntityId },
    SingleUseAttack,
    PrimaryAttack,
    SecondaryAttack,
    EndTurn,
    ApplyEffect,
    RemoveEffect,
    ChangeActiveHermit { slot: EntityId },
    PickRequest { slot: EntityId },
    ModalRequest { result: ModalResult },
    WaitForTurn,
    WaitForOpponentAction,
    Delay { millis: u32 },
}

impl TurnActionData {
    #[must_use]
    pub fn kind(&self) -> TurnAction {
        match self {
            TurnActionData::PlayHermitCard { .. } => TurnAction::PlayHermitCard,
            TurnActionData::PlayItemCard { .. } => TurnAction::PlayItemCard,
            TurnActionData::PlayEffectCard { .. } => TurnAction::PlayEffectCard,
            TurnActionData::PlaySingleUseCard { .. } => TurnAction::PlaySingleUseCard,
            TurnActionData::SingleUseAttack => TurnAction::SingleUseAttack,
            TurnActionData::PrimaryAttack => TurnAction::PrimaryAttack,
            TurnActionData::SecondaryAttack => TurnAction::SecondaryAttack,
            TurnActionData::EndTurn => TurnAction::EndTurn,
            TurnActionData::ApplyEffect => TurnAction::ApplyEffect,
            TurnActionData::RemoveEffect => TurnAction::RemoveEffect,
            TurnActionData::ChangeActiveHermit { .. } => TurnAction::ChangeActiveHermit,
            TurnActionData::PickRequest { .. } => TurnAction::PickRequest,
            TurnActionData::ModalRequest { .. } => TurnAction::ModalRequest,
            TurnActionData::WaitForTurn => TurnAction::WaitForTurn,
            TurnActionData::WaitForOpponentAction => TurnAction::WaitForOpponentAction,
            TurnActionData::Delay { .. } => TurnAction::Delay,
        }
    }

    /// Build a play-card action of the given kind.
    ///
    /// Returns `None` if `kind` is not a play-card kind.
    #[must_use]
    pub fn play_card(kind: TurnAction, card: EntityId, slot: EntityId) -> Option<Self> {
        match kind {
            TurnAction::PlayHermitCard => Some(TurnActionData::PlayHermitCard { card, slot }),
            TurnAction::PlayItemCard => Some(TurnActionData::PlayItemCard { card, slot }),
            TurnAction::PlayEffectCard => Some(TurnActionData::PlayEffectCard { card, slot }),
            TurnAction::PlaySingleUseCard => Some(TurnActionData::PlaySingleUseCard { card, slot }),
            _ => None,
        }
    }

    /// Build a payload-free action of the given kind.
    ///
    /// Returns `None` if `kind` carries a payload.
    #[must_use]
    pub fn simple(kind: TurnAction) -> Option<Self> {
        match kind {
            TurnAction::SingleUseAttack => Some(TurnActionData::SingleUseAttack),
            TurnAction::PrimaryAttack => Some(TurnActionData::PrimaryAttack),
            TurnAction::SecondaryAttack => Some(TurnActionData::SecondaryAttack),
            TurnAction::EndTurn => Some(TurnActionData::EndTurn),
            TurnAction::ApplyEffect => Some(TurnActionData::ApplyEffect),
            TurnAction::RemoveEffect => Some(TurnActionData::RemoveEffect),
            TurnAction::WaitForTurn => Some(TurnActionData::WaitForTurn),
            TurnAction::WaitForOpponentAction => Some(TurnActionData::WaitForOpponentAction),
            _ => None,
        }
    }

    /// `(card, slot)` for play-card actions.
    #[must_use]
    pub fn played_card(&self) -> Option<(EntityId, EntityId)> {
        match *self {
            TurnActionData::PlayHermitCard { card, slot }
            | TurnActionData::PlayItemCard { card, slot }
            | TurnActionData::PlayEffectCard { card, slot }
            | TurnActionData::PlaySingleUseCard { card, slot } => Some((card, slot)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcodes_are_unique() {
        for (i, a) in TurnAction::ALL.iter().enumerate() {
            for b in &TurnAction::ALL[i + 1..] {
                assert_ne!(a.opcode(), b.opcode(), "{a} and {b} share an opcode");
            }
        }
    }

    #[test]
    fn test_from_opcode() {
        assert_eq!(TurnAction::from_opcode(0xA), Some(TurnAction::ChangeActiveHermit));
        assert_eq!(TurnAction::from_opcode(0xF0), Some(TurnAction::Delay));
        assert_eq!(TurnAction::from_opcode(0x10), None);
    }

    #[test]
    fn test_kind_matches_constructors() {
        for kind in TurnAction::PLAY_CARD {
            let data = TurnActionData::play_card(kind, EntityId(1), EntityId(2)).unwrap();
            assert_eq!(data.kind(), kind);
            assert_eq!(data.played_card(), Some((EntityId(1), EntityId(2))));
        }
        assert!(TurnActionData::play_card(TurnAction::EndTurn, EntityId(1), EntityId(2)).is_none());
        assert_eq!(TurnActionData::simple(TurnAction::EndTurn), Some(TurnActionData::EndTurn));
        assert!(TurnActionData::simple(TurnAction::PickRequest).is_none());
    }

    #[test]
    fn test_serialization() {
        let action = TurnActionData::ChangeActiveHermit { slot: EntityId(9) };
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("CHANGE_ACTIVE_HERMIT"));
        let back: TurnActionData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
