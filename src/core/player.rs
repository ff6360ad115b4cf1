//! Seats.
//!
//! A [`PlayerId`] is a seat at the table, not the player entity sitting in
//! it; [`GameState::player_entity`](crate::core::GameState::player_entity)
//! maps one to the other. Seat 0 moves first.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Seats at the table.
pub const SEAT_COUNT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const FIRST: PlayerId = PlayerId(0);
    pub const SECOND: PlayerId = PlayerId(1);

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - (self.0 & 1))
    }

    /// Both seats, first mover first.
    pub fn all() -> impl Iterator<Item = PlayerId> {
        [Self::FIRST, Self::SECOND].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::FIRST => f.write_str("first seat"),
            _ => f.write_str("second seat"),
        }
    }
}

/// One value per seat.
///
/// ```
/// use hc_engine::core::{PlayerId, PlayerMap};
///
/// let mut lives: PlayerMap<u8> = PlayerMap::new(|_| 3);
/// lives[PlayerId::SECOND] -= 1;
/// assert_eq!(lives[PlayerId::FIRST], 3);
/// assert_eq!(lives[PlayerId::SECOND], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; SEAT_COUNT],
}

impl<T> PlayerMap<T> {
    pub fn new(mut factory: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::FIRST), factory(PlayerId::SECOND)],
        }
    }

    #[must_use]
    pub fn get(&self, seat: PlayerId) -> &T {
        &self.data[seat.index() % SEAT_COUNT]
    }

    pub fn get_mut(&mut self, seat: PlayerId) -> &mut T {
        &mut self.data[seat.index() % SEAT_COUNT]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all().zip(self.data.iter())
    }

    /// The seat whose value matches.
    pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<PlayerId> {
        self.iter().find(|(_, v)| pred(v)).map(|(seat, _)| seat)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, seat: PlayerId) -> &T {
        self.get(seat)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, seat: PlayerId) -> &mut T {
        self.get_mut(seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_seat() {
        assert_eq!(PlayerId::FIRST.opponent(), PlayerId::SECOND);
        assert_eq!(PlayerId::SECOND.opponent(), PlayerId::FIRST);
        assert_eq!(PlayerId::SECOND.to_string(), "second seat");
    }

    #[test]
    fn test_seat_lookup() {
        let names = PlayerMap::new(|seat| if seat == PlayerId::FIRST { "Alice" } else { "Bob" });
        assert_eq!(names[PlayerId::SECOND], "Bob");
        assert_eq!(names.position(|n| *n == "Bob"), Some(PlayerId::SECOND));
        assert_eq!(names.position(|n| *n == "Carol"), None);
        let seats: Vec<PlayerId> = names.iter().map(|(seat, _)| seat).collect();
        assert_eq!(seats, vec![PlayerId::FIRST, PlayerId::SECOND]);
    }

    #[test]
    fn test_json_shape() {
        let lives: PlayerMap<u8> = PlayerMap::new(|seat| 3 - seat.0);
        let json = serde_json::to_string(&lives).unwrap();
        assert_eq!(json, r#"{"data":[3,2]}"#);
        assert_eq!(serde_json::from_str::<PlayerMap<u8>>(&json).unwrap(), lives);
    }
}
