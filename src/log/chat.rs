//! Chat entries and the clock that stamps them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// Body of a chat entry.
///
/// Text keeps its inline markup (`$p...$`, `{You|name}`) unresolved; the
/// presentation layer formats it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum ChatContent {
    Text(String),
    /// Horizontal rule between turns.
    Line,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    pub message: ChatContent,
    /// Player entity the entry is attributed to.
    pub sender: EntityId,
    pub system_message: bool,
}

impl ChatMessage {
    /// The text of the entry, if it has any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.message {
            ChatContent::Text(s) => Some(s),
            ChatContent::Line => None,
        }
    }
}

/// Source of wall-clock time for chat timestamps and replay timing.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_millis(&self) -> u64;
}

/// Reads the system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// A manually advanced clock, for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self(AtomicU64::new(start))
    }

    pub fn advance(&self, millis: u64) {
        self.0.fetch_add(millis, Ordering::Relaxed);
    }

    pub fn set(&self, millis: u64) {
        self.0.store(millis, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(1_000);
        clock.advance(250);
        assert_eq!(clock.now_millis(), 1_250);
        clock.set(5);
        assert_eq!(clock.now_millis(), 5);
    }

    #[test]
    fn test_chat_message_json() {
        let msg = ChatMessage {
            created_at: 7,
            message: ChatContent::Text("$pEthosLab$ attacked".into()),
            sender: EntityId(1),
            system_message: true,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["createdAt"], 7);
        assert_eq!(json["systemMessage"], true);
        assert_eq!(msg.text(), Some("$pEthosLab$ attacked"));
    }
}
