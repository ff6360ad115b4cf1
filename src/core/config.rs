//! Game configuration types.
//!
//! - `GameConfig`: board shape, lives, hand size and damage constants
//! - `DeckLimits`: deck-building rules checked when a game is built
//! - `DebugConfig`: switches used by test harnesses and debug lobbies
//!
//! Both are plain serde structs with defaults for every field, so a partial
//! JSON document is a valid configuration:
//!
//! ```
//! use hc_engine::core::GameConfig;
//!
//! let config = GameConfig::from_json(r#"{ "lives": 2, "debug": { "disable_damage": true } }"#).unwrap();
//! assert_eq!(config.lives, 2);
//! assert_eq!(config.rows, 5);
//! assert!(config.debug.disable_damage);
//! ```

use serde::{Deserialize, Serialize};

/// Engine-wide tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Lives each player starts with.
    pub lives: u8,
    /// Board rows per player.
    pub rows: u8,
    /// Item slots per row.
    pub item_slots: u8,
    /// Cards drawn before the first turn.
    pub starting_hand_size: usize,
    /// Cards drawn at the end of each turn.
    pub turn_draw: usize,
    /// Damage of the synthesised weakness sub-attack.
    pub weakness_damage: u32,
    /// Shuffle decks at setup. Tests turn this off to control draws.
    pub shuffle_decks: bool,
    pub deck_limits: DeckLimits,
    pub debug: DebugConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            rows: 5,
            item_slots: 3,
            starting_hand_size: 7,
            turn_draw: 1,
            weakness_damage: 20,
            shuffle_decks: true,
            deck_limits: DeckLimits::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    // === Builder ===

    #[must_use]
    pub fn with_lives(mut self, lives: u8) -> Self {
        self.lives = lives;
        self
    }

    #[must_use]
    pub fn with_rows(mut self, rows: u8) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    /// Keep decks in the order they were given.
    #[must_use]
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle_decks = false;
        self
    }

    #[must_use]
    pub fn with_deck_limits(mut self, limits: DeckLimits) -> Self {
        self.deck_limits = limits;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Accept any deck of known cards.
    #[must_use]
    pub fn without_deck_validation(mut self) -> Self {
        self.debug.disable_deck_validation = true;
        self
    }
}

/// Deck-building limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckLimits {
    pub min_cards: usize,
    pub max_cards: usize,
    /// Copies allowed of any non-item card. `None` lifts the limit.
    pub max_duplicates: Option<usize>,
    pub max_rares: usize,
    pub max_ultra_rares: usize,
    pub min_hermits: usize,
    pub max_hermits: Option<usize>,
    /// Expansions whose cards may not be used.
    pub disabled_expansions: Vec<String>,
}

impl Default for DeckLimits {
    fn default() -> Self {
        Self {
            min_cards: 42,
            max_cards: 42,
            max_duplicates: Some(3),
            max_rares: 2,
            max_ultra_rares: 1,
            min_hermits: 1,
            max_hermits: None,
            disabled_expansions: Vec::new(),
        }
    }
}

/// Debug switches. All off by default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Every attack with an attacker deals no damage.
    pub disable_damage: bool,
    /// Coin flips always land heads.
    pub force_coin_flip: bool,
    /// Attacks ignore energy costs.
    pub no_item_requirements: bool,
    /// Emit each attack's modification history to the battle log.
    pub log_attack_history: bool,
    /// Skip [`DeckLimits`] checks at setup.
    pub disable_deck_validation: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.lives, 3);
        assert_eq!(config.rows, 5);
        assert_eq!(config.item_slots, 3);
        assert_eq!(config.weakness_damage, 20);
        assert!(config.shuffle_decks);
        assert_eq!(config.deck_limits.min_cards, 42);
        assert_eq!(config.deck_limits.max_duplicates, Some(3));
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new()
            .with_lives(1)
            .with_starting_hand_size(3)
            .without_shuffle();

        assert_eq!(config.lives, 1);
        assert_eq!(config.starting_hand_size, 3);
        assert!(!config.shuffle_decks);
    }

    #[test]
    fn test_partial_json() {
        let config = GameConfig::from_json(r#"{"rows": 3}"#).unwrap();
        assert_eq!(config.rows, 3);
        assert_eq!(config.lives, 3);
    }

    #[test]
    fn test_partial_deck_limits() {
        let config = GameConfig::from_json(
            r#"{"deck_limits": {"min_cards": 20, "max_duplicates": null, "disabled_expansions": ["alter_egos"]}}"#,
        )
        .unwrap();
        assert_eq!(config.deck_limits.min_cards, 20);
        assert_eq!(config.deck_limits.max_cards, 42);
        assert_eq!(config.deck_limits.max_duplicates, None);
        assert_eq!(config.deck_limits.disabled_expansions, vec!["alter_egos".to_string()]);
        assert!(!config.debug.disable_deck_validation);
        assert!(config.without_deck_validation().debug.disable_deck_validation);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(GameConfig::from_json(r#"{"rows": "many"}"#).is_err());
    }
}
