//! Whole-game flow: views, win conditions, configuration and running games
//! side by side.

mod common;

use std::thread;

use common::*;
use hc_engine::log::ChatContent;
use hc_engine::{
    DeckError, EngineError, GameBuilder, GameConfig, GameOutcome, PlayerId, TurnAction, TurnActionData, WinReason,
};

#[test]
fn test_view_hides_the_opponents_hand() {
    let mut game = new_game();
    let (alice, bob) = seats(&game);
    let view = game.view_for(alice).unwrap();

    assert_eq!(view.hand.len(), 7);
    assert!(view.hand.iter().all(|c| game.player(alice).unwrap().hand.contains(&c.entity)));
    assert_eq!(view.opponent.hand_size, 7);
    assert_eq!(view.opponent.deck_size, 13);
    assert_eq!(view.opponent.entity, bob);
    assert!(view.available_actions.contains(&TurnAction::PlayHermitCard));

    let json = serde_json::to_string(&view).unwrap();
    let bobs_cards = &game.player(bob).unwrap().hand;
    for card in bobs_cards {
        assert!(!json.contains(&format!("\"entity\":{}", card.raw())));
    }

    let theirs = game.view_for(bob).unwrap();
    assert_eq!(theirs.available_actions, vec![TurnAction::WaitForTurn]);
}

#[test]
fn test_no_hermits_loses_at_turn_start() {
    let mut game = new_game();
    let (alice, bob) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    end_turn(&mut game);
    // Bob never places a hermit
    end_turn(&mut game);
    assert!(!game.is_over());
    end_turn(&mut game);

    assert_eq!(game.turn.turn_number, 4);
    assert_eq!(
        game.outcome(),
        Some(&GameOutcome::Winner {
            winner: PlayerId::FIRST,
            reason: WinReason::NoHermits
        })
    );
    let err = game.apply_turn_action(bob, TurnActionData::EndTurn).unwrap_err();
    assert!(matches!(err, EngineError::GameOver));
}

#[test]
fn test_failed_draw_loses_the_game() {
    let short = &DECK[..8];
    let mut game = game_with(GameConfig::default(), short, &DECK);
    let (alice, bob) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    end_turn(&mut game);
    assert!(game.player(alice).unwrap().deck.is_empty());

    play(&mut game, bob, "ethoslab_common", 0);
    end_turn(&mut game);
    end_turn(&mut game);
    assert_eq!(
        game.outcome(),
        Some(&GameOutcome::Winner {
            winner: PlayerId::SECOND,
            reason: WinReason::DeckOut
        })
    );
    assert!(game.outcome().unwrap().is_winner(PlayerId::SECOND));
}

#[test]
fn test_forfeit() {
    let mut game = new_game();
    let (alice, bob) = seats(&game);
    game.forfeit(bob, WinReason::Timeout).unwrap();

    assert_eq!(
        game.outcome(),
        Some(&GameOutcome::Winner {
            winner: PlayerId::FIRST,
            reason: WinReason::Timeout
        })
    );
    assert!(game.available_actions(alice).is_empty());
    assert!(matches!(game.forfeit(alice, WinReason::Forfeit), Err(EngineError::GameOver)));
    assert!(matches!(
        game.apply_turn_action(alice, TurnActionData::EndTurn),
        Err(EngineError::GameOver)
    ));
}

#[test]
fn test_moving_out_of_turn_is_refused() {
    let mut game = new_game();
    let (_, bob) = seats(&game);
    let err = game.apply_turn_action(bob, TurnActionData::EndTurn).unwrap_err();
    assert!(matches!(err, EngineError::IllegalAction { .. }));

    let stranger = hc_engine::EntityId(9999);
    let err = game.apply_turn_action(stranger, TurnActionData::EndTurn).unwrap_err();
    assert!(matches!(err, EngineError::WrongPlayer(_)));
}

#[test]
fn test_first_turn_cannot_attack() {
    let config = GameConfig::default().with_debug(hc_engine::core::DebugConfig {
        no_item_requirements: true,
        ..Default::default()
    });
    let mut game = game_with(config, &DECK, &DECK);
    let (alice, _) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    let actions = game.available_actions(alice);
    assert!(!actions.contains(&TurnAction::PrimaryAttack));
    assert!(!actions.contains(&TurnAction::SecondaryAttack));
}

#[test]
fn test_unknown_card_in_deck() {
    let result = GameBuilder::new(registry())
        .with_player(PlayerId::FIRST, "Alice", ["ethoslab_common", "no_such_card"])
        .with_player(PlayerId::SECOND, "Bob", DECK)
        .build();
    assert!(matches!(result, Err(EngineError::UnknownCard(id)) if id == "no_such_card"));
}

#[test]
fn test_default_limits_reject_the_fixture_deck() {
    let mut legal = vec!["redstone_item_common"; 38];
    legal.extend(["ethoslab_common", "ethoslab_common", "iron_sword", "ijevin_rare"]);
    let result = GameBuilder::new(registry())
        .with_player(PlayerId::FIRST, "Alice", legal.clone())
        .with_player(PlayerId::SECOND, "Bob", DECK)
        .build();
    // The fixture deck is short and rare-heavy; rares are checked first
    assert!(matches!(
        result,
        Err(EngineError::InvalidDeck {
            seat: PlayerId::SECOND,
            reason: DeckError::TooManyRares { max: 2 },
        })
    ));

    let game = GameBuilder::new(registry())
        .with_player(PlayerId::FIRST, "Alice", legal.clone())
        .with_player(PlayerId::SECOND, "Bob", legal)
        .build()
        .unwrap();
    assert_eq!(game.turn.turn_number, 1);
}

#[test]
fn test_partial_json_config() {
    let config = GameConfig::from_json(r#"{"lives": 1, "debug": {"disable_damage": true}}"#).unwrap();
    assert_eq!(config.lives, 1);
    assert!(config.debug.disable_damage);
    assert!(!config.debug.no_item_requirements);
    assert_eq!(config.starting_hand_size, GameConfig::default().starting_hand_size);

    let game = game_with(config, &DECK, &DECK);
    let (alice, _) = seats(&game);
    assert_eq!(game.player(alice).unwrap().lives, 1);
}

#[test]
fn test_chat_gets_a_separator_per_turn() {
    let mut game = new_game();
    let (alice, _) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    end_turn(&mut game);
    end_turn(&mut game);

    let lines = game.chat.iter().filter(|m| m.message == ChatContent::Line).count();
    assert_eq!(lines, 2);
    assert!(game.chat.iter().any(|m| m.text().is_some_and(|t| t.contains("Etho"))));
}

#[test]
fn test_cloned_games_diverge() {
    let mut game = new_game();
    let (alice, _) = seats(&game);
    let snapshot = game.clone();
    play(&mut game, alice, "ethoslab_common", 0);

    assert_eq!(health(&game, alice, 0), Some(280));
    assert_eq!(health(&snapshot, alice, 0), None);
    assert_eq!(snapshot.player(alice).unwrap().hand.len(), 7);
    assert!(snapshot.replay_record().actions.is_empty());
}

#[test]
fn test_games_run_on_separate_threads() {
    let registry = registry();
    let turns: Vec<u32> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let registry = registry.clone();
                scope.spawn(move || {
                    let mut game = game_from(registry, GameConfig::default(), &DECK, &DECK);
                    let (alice, bob) = seats(&game);
                    play(&mut game, alice, "ethoslab_common", 0);
                    end_turn(&mut game);
                    play(&mut game, bob, "ethoslab_common", 0);
                    for _ in 0..n {
                        end_turn(&mut game);
                    }
                    game.turn.turn_number
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(turns, vec![2, 3, 4, 5]);
}
