//! # hc-engine
//!
//! A deterministic, server-authoritative rules engine for a two-player
//! hermit card battle.
//!
//! The server owns one [`GameState`] per match. Clients submit
//! [`TurnActionData`] through [`GameState::apply_turn_action`], read what
//! they may see through [`GameState::view_for`], and the game records
//! itself as a compact [`ReplayRecord`] that [`replay_game`] plays back.
//!
//! ## Architecture
//!
//! - **Entities and components**: cards, rows, slots, players, observers and
//!   status effects are components keyed by [`EntityId`] in one store.
//!   Persistent maps (`im-rs`) keep snapshots cheap.
//!
//! - **Hooks and observers**: cards react to game events by subscribing to
//!   per-player hooks through an observer, which is torn down when the card
//!   leaves play.
//!
//! - **Attack pipeline**: attacks are built, modified by hooks in a fixed
//!   phase order, then resolved into row damage with weakness sub-attacks.
//!
//! - **Requests**: cards that need a choice open pick or modal requests; the
//!   addressed player answers before anyone else acts.
//!
//! ## Modules
//!
//! - `core`: entity ids, seats, configuration, RNG, turn actions, game state
//! - `components`: the component store and every component type
//! - `query`: composable predicates over components
//! - `hooks`: typed hooks, subscriptions and dispatch
//! - `cards`: card props, the card behavior trait, registry and catalogue
//! - `attacks`: the attack model and pipeline
//! - `status_effects`: built-in status effects
//! - `requests`: pick and modal requests
//! - `log`: battle log and chat
//! - `rules`: setup, legal actions, turn flow and board primitives
//! - `replay`: the binary action codec and replay records
//! - `view`: per-player views

pub mod attacks;
pub mod cards;
pub mod components;
pub mod core;
pub mod error;
pub mod hooks;
pub mod log;
pub mod query;
pub mod replay;
pub mod requests;
pub mod rules;
pub mod status_effects;
pub mod view;

// Re-export commonly used types
pub use crate::core::{
    EntityId, GameConfig, GameOutcome, GameState, PlayerId, PlayerMap, TurnAction, TurnActionData, WinReason,
};

pub use crate::cards::{Card, CardCategory, CardProps, CardRegistry};

pub use crate::error::{DeckError, EngineError, Result};

pub use crate::requests::{ActionResult, ModalResult, Request};

pub use crate::rules::GameBuilder;

pub use crate::replay::{replay_game, CodecError, Frame, ReplayOutcome, ReplayRecord};

pub use crate::view::PlayerView;

const _: () = {
    const fn assert_send<T: Send>() {}
    assert_send::<GameState>();
};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::cards::{CardCategory, CardRegistry};
    use crate::components::{CardComponent, RowComponent};
    use crate::core::{EntityId, GameConfig, GameState, PlayerId};
    use crate::log::ManualClock;
    use crate::requests::ActionResult;
    use crate::rules::{play_action_for, GameBuilder};

    /// Opening hand first, in order, then the rest of the deck.
    pub const DECK: [&str; 20] = [
        "ethoslab_common",
        "ethoslab_common",
        "redstone_item_common",
        "redstone_item_common",
        "iron_sword",
        "gold_armor",
        "xisumavoid_rare",
        "falsesymmetry_rare",
        "ijevin_rare",
        "iskall85_rare",
        "dream_rare",
        "golden_axe",
        "knockback",
        "instant_health",
        "lava_bucket",
        "splash_potion_of_poison",
        "iron_armor",
        "thorns",
        "furnace",
        "redstone_item_rare",
    ];

    /// Unshuffled two-player game on a manual clock. The first seat is to
    /// move on turn 1.
    pub fn two_player_game() -> GameState {
        GameBuilder::new(Arc::new(CardRegistry::with_builtin()))
            .with_config(GameConfig::default().without_shuffle().without_deck_validation())
            .with_seed(42)
            .with_clock(Arc::new(ManualClock::new(0)))
            .with_player(PlayerId::FIRST, "Alice", DECK)
            .with_player(PlayerId::SECOND, "Bob", DECK)
            .build()
            .expect("fixture decks are valid")
    }

    pub fn hand_card(game: &GameState, player: EntityId, id: &str) -> Option<EntityId> {
        game.player(player)?
            .hand
            .iter()
            .copied()
            .find(|&c| game.components.get::<CardComponent>(c).is_some_and(|c| c.id() == id))
    }

    /// Play a card with id `id` onto `row`, fetching it from the deck first
    /// if it is not in hand. Items go to the first empty item slot.
    pub fn play(game: &mut GameState, player: EntityId, id: &str, row: usize) -> EntityId {
        let card = hand_card(game, player, id).unwrap_or_else(|| {
            let p = game.player(player).unwrap();
            let card = p
                .deck
                .iter()
                .copied()
                .find(|&c| game.components.get::<CardComponent>(c).unwrap().id() == id)
                .unwrap_or_else(|| panic!("{id} is not in the deck"));
            game.return_to_hand(card);
            card
        });

        let category = game.components.get::<CardComponent>(card).unwrap().category();
        let p = game.player(player).unwrap();
        let r = game.components.get::<RowComponent>(p.rows[row]).unwrap();
        let slot = match category {
            CardCategory::Hermit => r.hermit_slot,
            CardCategory::Attach => r.attach_slot,
            CardCategory::Item => *r
                .item_slots
                .iter()
                .find(|&&s| game.is_slot_empty(s))
                .expect("an empty item slot"),
            CardCategory::SingleUse => p.single_use_slot,
        };

        let result = game.play_card(player, play_action_for(category), card, slot);
        assert_eq!(result, ActionResult::Success, "playing {id}");
        card
    }
}
