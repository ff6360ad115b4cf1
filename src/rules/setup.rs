//! Game setup.
//!
//! ```
//! use std::sync::Arc;
//! use hc_engine::cards::CardRegistry;
//! use hc_engine::core::PlayerId;
//! use hc_engine::rules::GameBuilder;
//!
//! let mut deck = vec!["redstone_item_common"; 39];
//! deck.extend(["ethoslab_common"; 3]);
//! let game = GameBuilder::new(Arc::new(CardRegistry::with_builtin()))
//!     .with_seed(7)
//!     .with_player(PlayerId::FIRST, "Alice", deck.clone())
//!     .with_player(PlayerId::SECOND, "Bob", deck)
//!     .build()
//!     .unwrap();
//! assert_eq!(game.turn.turn_number, 1);
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use crate::cards::{Card, CardCategory, CardRegistry};
use crate::components::CardComponent;
use crate::core::{EntityId, GameConfig, GameState, PlayerId, PlayerMap};
use crate::error::{EngineError, Result};
use crate::log::{Clock, SystemClock};

use super::deck::validate_deck;

#[derive(Clone, Debug, Default)]
struct Seat {
    name: String,
    deck: Vec<String>,
}

/// Builds a ready-to-play game: decks created, shuffled and dealt, first
/// turn started.
#[derive(Clone)]
pub struct GameBuilder {
    registry: Arc<CardRegistry>,
    config: GameConfig,
    seed: u64,
    seats: PlayerMap<Seat>,
    clock: Arc<dyn Clock>,
}

impl GameBuilder {
    #[must_use]
    pub fn new(registry: Arc<CardRegistry>) -> Self {
        Self {
            registry,
            config: GameConfig::default(),
            seed: 0,
            seats: PlayerMap::new(|seat| Seat {
                name: format!("Player {}", seat.index() + 1),
                deck: Vec::new(),
            }),
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Seat a player with a deck of card ids.
    #[must_use]
    pub fn with_player<I, S>(mut self, seat: PlayerId, name: impl Into<String>, deck: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.seats.get_mut(seat) = Seat {
            name: name.into(),
            deck: deck.into_iter().map(Into::into).collect(),
        };
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create the game. Fails on an unknown card id, or on a deck outside
    /// the configured [`DeckLimits`](crate::core::DeckLimits) unless deck
    /// validation is disabled.
    pub fn build(self) -> Result<GameState> {
        let names = [
            self.seats.get(PlayerId::FIRST).name.clone(),
            self.seats.get(PlayerId::SECOND).name.clone(),
        ];
        let mut game = GameState::with_clock(self.config, Arc::clone(&self.registry), self.seed, names, self.clock);

        for (seat, entry) in self.seats.iter() {
            let cards = entry
                .deck
                .iter()
                .map(|id| self.registry.get(id).ok_or_else(|| EngineError::UnknownCard(id.clone())))
                .collect::<Result<Vec<_>>>()?;
            if !game.config.debug.disable_deck_validation {
                validate_deck(&cards, &game.config.deck_limits).map_err(|reason| {
                    warn!(%seat, %reason, "deck rejected");
                    EngineError::InvalidDeck { seat, reason }
                })?;
            }
            let player = game.player_entity(seat);
            deal(&mut game, player, cards);
            game.replay.decks[seat.index()] = entry.deck.clone();
        }

        info!(seed = game.seed(), "game created");
        game.start_turn();
        game.send_logs();
        Ok(game)
    }
}

/// Create the deck, shuffle it and draw the opening hand.
fn deal(game: &mut GameState, player: EntityId, cards: Vec<Arc<dyn Card>>) {
    let mut deck: Vec<EntityId> = cards
        .into_iter()
        .map(|card| create_card(game, player, card))
        .collect();

    if game.config.shuffle_decks {
        game.rng_mut().shuffle(&mut deck);
    }
    ensure_opening_hermit(game, &mut deck);

    if let Some(p) = game.player_mut(player) {
        p.deck = deck;
    }
    let hand_size = game.config.starting_hand_size;
    game.draw_cards(player, hand_size);
}

fn create_card(game: &mut GameState, player: EntityId, card: Arc<dyn Card>) -> EntityId {
    let deck_slot = game.player(player).map_or(EntityId(0), |p| p.deck_slot);
    let entity = game.components.create(|entity| CardComponent {
        entity,
        card: Arc::clone(&card),
        player,
        slot: deck_slot,
        turned_over: false,
        can_be_recovered: true,
        observer: None,
    });
    card.on_create(game, entity);
    entity
}

/// Swap the first hermit into the opening hand if none would be drawn.
fn ensure_opening_hermit(game: &GameState, deck: &mut [EntityId]) {
    let is_hermit = |card: &EntityId| {
        game.components
            .get::<CardComponent>(*card)
            .is_some_and(|c| c.category() == CardCategory::Hermit)
    };
    let hand = game.config.starting_hand_size.min(deck.len());
    if hand == 0 || deck[..hand].iter().any(is_hermit) {
        return;
    }
    if let Some(index) = deck.iter().position(is_hermit) {
        deck.swap(0, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckError;

    fn registry() -> Arc<CardRegistry> {
        Arc::new(CardRegistry::with_builtin())
    }

    #[test]
    fn test_unknown_card_fails() {
        let result = GameBuilder::new(registry())
            .with_player(PlayerId::FIRST, "A", ["not_a_card"])
            .build();
        assert_eq!(result.unwrap_err(), EngineError::UnknownCard("not_a_card".into()));
    }

    #[test]
    fn test_opening_hand_has_a_hermit() {
        let mut deck = vec!["redstone_item_common"; 41];
        deck.push("ethoslab_common");
        for seed in 0..20 {
            let game = GameBuilder::new(registry())
                .with_seed(seed)
                .with_player(PlayerId::FIRST, "A", deck.clone())
                .with_player(PlayerId::SECOND, "B", deck.clone())
                .build()
                .unwrap();
            let me = game.player_entity(PlayerId::FIRST);
            let hand = &game.player(me).unwrap().hand;
            assert_eq!(hand.len(), 7);
            assert!(hand
                .iter()
                .any(|&c| game.components.get::<CardComponent>(c).unwrap().category() == CardCategory::Hermit));
        }
    }

    #[test]
    fn test_same_seed_same_deal() {
        let deck: Vec<&str> = ["ethoslab_common", "iron_sword", "gold_armor", "redstone_item_common"]
            .into_iter()
            .cycle()
            .take(24)
            .collect();
        let build = || {
            GameBuilder::new(registry())
                .with_config(GameConfig::default().without_deck_validation())
                .with_seed(99)
                .with_player(PlayerId::FIRST, "A", deck.clone())
                .with_player(PlayerId::SECOND, "B", deck.clone())
                .build()
                .unwrap()
        };
        let (a, b) = (build(), build());
        let me = a.player_entity(PlayerId::FIRST);
        assert_eq!(a.player(me).unwrap().deck, b.player(me).unwrap().deck);
        assert_eq!(a.player(me).unwrap().hand, b.player(me).unwrap().hand);
    }

    #[test]
    fn test_invalid_deck_names_the_seat() {
        let mut legal = vec!["ethoslab_common"];
        legal.extend(["redstone_item_common"; 41]);
        let result = GameBuilder::new(registry())
            .with_player(PlayerId::FIRST, "A", legal.clone())
            .with_player(PlayerId::SECOND, "B", legal[..20].iter().copied())
            .build();
        assert_eq!(
            result.unwrap_err(),
            EngineError::InvalidDeck {
                seat: PlayerId::SECOND,
                reason: DeckError::WrongSize { expected: 42, found: 20 },
            }
        );
    }

    #[test]
    fn test_empty_decks_are_rejected() {
        let err = GameBuilder::new(registry()).build().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidDeck {
                seat: PlayerId::FIRST,
                reason: DeckError::TooFewHermits { .. },
            }
        ));
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let game = GameBuilder::new(registry())
            .with_config(GameConfig::default().without_deck_validation())
            .build()
            .unwrap();
        assert!(!game.is_over());
        assert_eq!(game.player_name(game.player_entity(PlayerId::SECOND)), "Player 2");
    }
}
