//! Entity identification system.
//!
//! Every game object (player, card, slot, row, observer, status effect) is
//! an `EntityId`. An id carries no type of its own: its meaning comes from
//! whichever component tables hold an entry for it.
//!
//! ## Allocation
//!
//! Ids are allocated monotonically by the component store of one game and
//! are never reused, so a stale id simply stops resolving once its entity
//! is deleted.
//!
//! ```
//! use hc_engine::core::EntityId;
//!
//! let card = EntityId::new(10);
//! assert_eq!(card.raw(), 10);
//! assert_eq!("10".parse::<EntityId>().unwrap(), card);
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for any game entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create an entity ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Parses the decimal form used on the wire (pick-request answers).
impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        let id = EntityId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(EntityId::from(7), id);
    }

    #[test]
    fn test_ordering_follows_allocation() {
        assert!(EntityId(3) < EntityId(4));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!("42".parse::<EntityId>(), Ok(EntityId(42)));
        assert!("abc".parse::<EntityId>().is_err());
        assert!("-1".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
