//! Shared helpers for the integration tests. Everything goes through the
//! public API: cards are played with `apply_turn_action` into slots the
//! engine reports as playable.

#![allow(dead_code)]

use std::sync::Arc;

use hc_engine::components::{CardComponent, RowComponent, SlotComponent, SlotKind};
use hc_engine::log::ManualClock;
use hc_engine::rules::play_action_for;
use hc_engine::{
    ActionResult, CardRegistry, EntityId, GameBuilder, GameConfig, GameState, PlayerId, TurnActionData,
};

/// Opening hand first, then the draw order.
pub const DECK: [&str; 20] = [
    "ethoslab_common",
    "redstone_item_common",
    "redstone_item_common",
    "gold_armor",
    "lava_bucket",
    "ethoslab_common",
    "iron_sword",
    "ijevin_rare",
    "redstone_item_common",
    "thorns",
    "instant_health",
    "knockback",
    "splash_potion_of_poison",
    "iron_armor",
    "golden_axe",
    "xisumavoid_rare",
    "falsesymmetry_rare",
    "iskall85_rare",
    "furnace",
    "redstone_item_rare",
];

pub fn registry() -> Arc<CardRegistry> {
    Arc::new(CardRegistry::with_builtin())
}

/// Unshuffled game on a manual clock, both players on [`DECK`].
pub fn new_game() -> GameState {
    game_with(GameConfig::default(), &DECK, &DECK)
}

pub fn game_with(config: GameConfig, first: &[&str], second: &[&str]) -> GameState {
    game_from(registry(), config, first, second)
}

pub fn game_from(registry: Arc<CardRegistry>, config: GameConfig, first: &[&str], second: &[&str]) -> GameState {
    GameBuilder::new(registry)
        .with_config(config.without_shuffle().without_deck_validation())
        .with_seed(1234)
        .with_clock(Arc::new(ManualClock::new(0)))
        .with_player(PlayerId::FIRST, "Alice", first.iter().copied())
        .with_player(PlayerId::SECOND, "Bob", second.iter().copied())
        .build()
        .unwrap()
}

pub fn seats(game: &GameState) -> (EntityId, EntityId) {
    (game.player_entity(PlayerId::FIRST), game.player_entity(PlayerId::SECOND))
}

pub fn hand_card(game: &GameState, player: EntityId, id: &str) -> Option<EntityId> {
    game.player(player)?
        .hand
        .iter()
        .copied()
        .find(|&c| game.components.get::<CardComponent>(c).is_some_and(|c| c.id() == id))
}

/// Move the first `id` card in the deck to the hand.
pub fn fetch(game: &mut GameState, player: EntityId, id: &str) -> EntityId {
    let card = game
        .player(player)
        .unwrap()
        .deck
        .iter()
        .copied()
        .find(|&c| game.components.get::<CardComponent>(c).unwrap().id() == id)
        .unwrap_or_else(|| panic!("{id} is not in the deck"));
    game.return_to_hand(card);
    card
}

pub fn row(game: &GameState, player: EntityId, index: usize) -> EntityId {
    game.player(player).unwrap().rows[index]
}

pub fn health(game: &GameState, player: EntityId, index: usize) -> Option<u32> {
    let row = row(game, player, index);
    game.components.get::<RowComponent>(row).unwrap().health
}

/// Play `id` from hand onto row `index` (ignored for single-use cards).
pub fn play(game: &mut GameState, player: EntityId, id: &str, index: usize) -> EntityId {
    let card = hand_card(game, player, id).unwrap_or_else(|| panic!("{id} is not in hand"));
    assert_eq!(try_play(game, player, card, index), ActionResult::Success, "playing {id}");
    card
}

pub fn try_play(game: &mut GameState, player: EntityId, card: EntityId, index: usize) -> ActionResult {
    let category = game.components.get::<CardComponent>(card).unwrap().category();
    let target_row = row(game, player, index);
    let slot = game.playable_slots(card).into_iter().find(|&s| {
        let s = game.components.get::<SlotComponent>(s).unwrap();
        s.kind == SlotKind::SingleUse || s.row == Some(target_row)
    });
    let Some(slot) = slot else {
        return ActionResult::FailureUnmetCondition;
    };
    let data = TurnActionData::play_card(play_action_for(category), card, slot).unwrap();
    game.apply_turn_action(player, data).unwrap()
}

pub fn act(game: &mut GameState, player: EntityId, data: TurnActionData) -> ActionResult {
    game.apply_turn_action(player, data).unwrap()
}

pub fn end_turn(game: &mut GameState) {
    let player = game.current_player_entity().unwrap();
    assert_eq!(act(game, player, TurnActionData::EndTurn), ActionResult::Success);
}
