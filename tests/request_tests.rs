//! Pick and modal request integration tests.

mod common;

use common::*;
use hc_engine::components::RowComponent;
use hc_engine::requests::{ModalData, ModalRequest};
use hc_engine::view::RequestView;
use hc_engine::{ActionResult, EngineError, GameState, ModalResult, TurnAction, TurnActionData};

/// Alice has one Etho and a redstone item on row 0. Bob has Ethos on rows
/// 0 (active) and 1. Alice holds knockback and is to move on turn 3.
fn knockback_setup() -> GameState {
    let mut game = new_game();
    let (alice, bob) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    play(&mut game, alice, "redstone_item_common", 0);
    end_turn(&mut game);
    play(&mut game, bob, "ethoslab_common", 0);
    play(&mut game, bob, "ethoslab_common", 1);
    end_turn(&mut game);
    fetch(&mut game, alice, "knockback");
    play(&mut game, alice, "knockback", 0);
    game
}

fn hermit_slot(game: &GameState, player: hc_engine::EntityId, index: usize) -> hc_engine::EntityId {
    let row = row(game, player, index);
    game.components.get::<RowComponent>(row).unwrap().hermit_slot
}

#[test]
fn test_knockback_opens_a_pick_for_the_opponent() {
    let mut game = knockback_setup();
    let (alice, bob) = seats(&game);
    act(&mut game, alice, TurnActionData::PrimaryAttack);

    assert_eq!(game.acting_player(), Some(bob));
    assert_eq!(game.available_actions(bob), vec![TurnAction::PickRequest]);
    assert_eq!(game.available_actions(alice), vec![TurnAction::WaitForOpponentAction]);
    assert_eq!(game.pickable_slots(), vec![hermit_slot(&game, bob, 1)]);

    let err = game.apply_turn_action(alice, TurnActionData::EndTurn).unwrap_err();
    assert!(matches!(err, EngineError::IllegalAction { .. }));
}

#[test]
fn test_invalid_answer_keeps_the_request_open() {
    let mut game = knockback_setup();
    let (alice, bob) = seats(&game);
    act(&mut game, alice, TurnActionData::PrimaryAttack);

    let active = hermit_slot(&game, bob, 0);
    let result = act(&mut game, bob, TurnActionData::PickRequest { slot: active });
    assert_eq!(result, ActionResult::FailureUnmetCondition);
    assert!(game.active_request().is_some());

    let afk = hermit_slot(&game, bob, 1);
    assert_eq!(act(&mut game, bob, TurnActionData::PickRequest { slot: afk }), ActionResult::Success);
    assert!(game.active_request().is_none());
    assert_eq!(game.active_row_of(bob), Some(row(&game, bob, 1)));
    assert!(game.available_actions(alice).contains(&TurnAction::EndTurn));
}

#[test]
fn test_timeout_picks_for_the_player_once() {
    let mut game = knockback_setup();
    let (alice, bob) = seats(&game);
    act(&mut game, alice, TurnActionData::PrimaryAttack);

    assert!(game.timeout_active_request());
    assert_eq!(game.active_row_of(bob), Some(row(&game, bob, 1)));
    assert!(!game.timeout_active_request());
    assert_eq!(game.acting_player(), Some(alice));
}

#[test]
fn test_views_show_the_request_to_its_player_only() {
    let mut game = knockback_setup();
    let (alice, bob) = seats(&game);
    act(&mut game, alice, TurnActionData::PrimaryAttack);

    let bobs = game.view_for(bob).unwrap();
    match bobs.request {
        Some(RequestView::Pick { pickable, .. }) => assert_eq!(pickable, vec![hermit_slot(&game, bob, 1)]),
        other => panic!("expected a pick request, got {other:?}"),
    }
    assert!(!bobs.opponent_busy);

    let alices = game.view_for(alice).unwrap();
    assert!(alices.request.is_none());
    assert!(alices.opponent_busy);
}

#[test]
fn test_instant_health_heals_the_picked_hermit() {
    let mut game = new_game();
    let (alice, _) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    let alice_row = row(&game, alice, 0);
    game.components.get_mut::<RowComponent>(alice_row).unwrap().health = Some(200);
    fetch(&mut game, alice, "instant_health");
    play(&mut game, alice, "instant_health", 0);

    assert_eq!(game.available_actions(alice), vec![TurnAction::PickRequest]);
    let slot = hermit_slot(&game, alice, 0);
    assert_eq!(act(&mut game, alice, TurnActionData::PickRequest { slot }), ActionResult::Success);
    assert_eq!(health(&game, alice, 0), Some(230));
    assert!(game.player(alice).unwrap().single_use_used);
}

#[test]
fn test_heal_is_capped_at_max_health() {
    let mut game = new_game();
    let (alice, _) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    let alice_row = row(&game, alice, 0);
    game.components.get_mut::<RowComponent>(alice_row).unwrap().health = Some(270);
    fetch(&mut game, alice, "instant_health");
    play(&mut game, alice, "instant_health", 0);

    let slot = hermit_slot(&game, alice, 0);
    act(&mut game, alice, TurnActionData::PickRequest { slot });
    assert_eq!(health(&game, alice, 0), Some(280));
}

#[test]
fn test_pick_without_targets_is_never_queued() {
    let mut game = new_game();
    let (alice, _) = seats(&game);
    let card = fetch(&mut game, alice, "instant_health");
    assert!(game.playable_slots(card).is_empty());

    let slot = game.player(alice).unwrap().single_use_slot;
    let result = act(&mut game, alice, TurnActionData::PlaySingleUseCard { card, slot });
    assert_eq!(result, ActionResult::FailureUnmetCondition);
    assert!(game.active_request().is_none());
    assert!(game.player(alice).unwrap().hand.contains(&card));
}

#[test]
fn test_modal_answer_through_turn_action() {
    let mut game = new_game();
    let (alice, bob) = seats(&game);
    game.add_modal_request(ModalRequest::new(
        bob,
        alice,
        ModalData::Confirm {
            title: "Accept?".into(),
            description: String::new(),
        },
        |game, answer| match answer {
            ModalResult::Confirm { result: true } => {
                let bob = game.opponent_player_entity().unwrap();
                game.draw_cards(bob, 1);
                ActionResult::Success
            }
            _ => ActionResult::FailureInvalidData,
        },
    ));
    assert_eq!(game.available_actions(bob), vec![TurnAction::ModalRequest]);

    let hand = game.player(bob).unwrap().hand.len();
    let no = TurnActionData::ModalRequest {
        result: ModalResult::Choice { index: 0 },
    };
    assert_eq!(act(&mut game, bob, no), ActionResult::FailureInvalidData);
    let yes = TurnActionData::ModalRequest {
        result: ModalResult::Confirm { result: true },
    };
    assert_eq!(act(&mut game, bob, yes), ActionResult::Success);
    assert_eq!(game.player(bob).unwrap().hand.len(), hand + 1);
    assert_eq!(game.acting_player(), Some(alice));
}
