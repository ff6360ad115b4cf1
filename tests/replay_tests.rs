//! Replay codec integration tests: frame layout against a live game,
//! frame round trips, and replaying a recorded game.

mod common;

use std::sync::Arc;

use common::*;
use hc_engine::components::RowComponent;
use hc_engine::log::ManualClock;
use hc_engine::replay::{decode_frame, decode_frames, Payload};
use hc_engine::{
    replay_game, CodecError, EntityId, Frame, GameBuilder, GameConfig, GameState, PlayerId, ReplayRecord, TurnAction,
    TurnActionData,
};
use proptest::prelude::*;

const ALICE_DECK: [&str; 12] = [
    "ethoslab_common",
    "redstone_item_common",
    "redstone_item_common",
    "knockback",
    "ethoslab_common",
    "iron_sword",
    "gold_armor",
    "redstone_item_common",
    "lava_bucket",
    "ijevin_rare",
    "thorns",
    "redstone_item_rare",
];

fn clocked_game(first: &[&str], second: &[&str]) -> (GameState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(10_000));
    let game = GameBuilder::new(registry())
        .with_config(GameConfig::default().without_shuffle().without_deck_validation())
        .with_seed(77)
        .with_clock(clock.clone())
        .with_player(PlayerId::FIRST, "Alice", first.iter().copied())
        .with_player(PlayerId::SECOND, "Bob", second.iter().copied())
        .build()
        .unwrap();
    (game, clock)
}

fn hermit_slot(game: &GameState, player: EntityId, index: usize) -> EntityId {
    let row = row(game, player, index);
    game.components.get::<RowComponent>(row).unwrap().hermit_slot
}

#[test]
fn test_play_hermit_frame_against_the_board() {
    let deck = ["redstone_item_common", "redstone_item_common", "gold_armor", "ethoslab_common"];
    let mut deck: Vec<&str> = deck.to_vec();
    deck.extend(DECK);
    let (game, _) = clocked_game(&deck, &DECK);
    let (alice, _) = seats(&game);
    let card = game.player(alice).unwrap().hand[3];
    let slot = hermit_slot(&game, alice, 2);

    let data = TurnActionData::PlayHermitCard { card, slot };
    let frame = game.frame_for(alice, &data, 1200).unwrap();
    assert_eq!(frame.tenths, 12);
    assert_eq!(
        frame.payload,
        Payload::PlayCard {
            row: 2,
            column: 4,
            hand_index: 3
        }
    );
    assert_eq!(frame.to_bytes().unwrap(), vec![0x00, 0x00, 0x0C, 0x02, 0x04, 0x03]);
    assert_eq!(game.action_from_frame(&frame).unwrap(), (alice, data));
}

#[test]
fn test_column_six_reads_as_single_use() {
    let (game, _) = clocked_game(&DECK, &DECK);
    let (alice, _) = seats(&game);
    let frame = Frame::new(
        TurnAction::PlaySingleUseCard,
        0,
        Payload::PlayCard {
            row: 0,
            column: 6,
            hand_index: 6,
        },
    );
    let (player, data) = game.action_from_frame(&frame).unwrap();
    assert_eq!(player, alice);
    assert_eq!(
        data,
        TurnActionData::PlaySingleUseCard {
            card: game.player(alice).unwrap().hand[6],
            slot: game.player(alice).unwrap().single_use_slot,
        }
    );
}

#[test]
fn test_out_of_range_positions_are_rejected() {
    let (game, _) = clocked_game(&DECK, &DECK);
    let bad_row = Frame::new(TurnAction::ChangeActiveHermit, 0, Payload::Row(5));
    assert!(matches!(game.action_from_frame(&bad_row), Err(CodecError::BadPayload { .. })));

    let bad_hand = Frame::new(
        TurnAction::PlayItemCard,
        0,
        Payload::PlayCard {
            row: 0,
            column: 0,
            hand_index: 7,
        },
    );
    assert!(matches!(game.action_from_frame(&bad_hand), Err(CodecError::BadPayload { .. })));
}

fn payload_for(action: TurnAction) -> BoxedStrategy<Payload> {
    match action {
        TurnAction::PlayHermitCard
        | TurnAction::PlayItemCard
        | TurnAction::PlayEffectCard
        | TurnAction::PlaySingleUseCard => (0u8..5, 0u8..7, 0u8..7)
            .prop_map(|(row, column, hand_index)| Payload::PlayCard { row, column, hand_index })
            .boxed(),
        TurnAction::ChangeActiveHermit => (0u8..5).prop_map(Payload::Row).boxed(),
        TurnAction::PickRequest => any::<u32>().prop_map(|id| Payload::Pick(id.to_string())).boxed(),
        TurnAction::ModalRequest => Just(Payload::Modal(r#"{"type":"confirm","result":true}"#.to_string())).boxed(),
        TurnAction::Delay => any::<u32>().prop_map(Payload::Delay).boxed(),
        _ => Just(Payload::None).boxed(),
    }
}

fn frame() -> impl Strategy<Value = Frame> {
    let opcodes: Vec<u8> = (0x0..=0xE).chain([0xF0]).collect();
    (prop::sample::select(opcodes), any::<u16>()).prop_flat_map(|(opcode, tenths)| {
        let action = TurnAction::from_opcode(opcode).unwrap();
        payload_for(action).prop_map(move |payload| Frame::new(action, tenths, payload))
    })
}

proptest! {
    #[test]
    fn prop_frames_round_trip(frames in prop::collection::vec(frame(), 0..16)) {
        let mut bytes = Vec::new();
        for f in &frames {
            f.encode(&mut bytes).unwrap();
        }
        let (decoded, err) = decode_frames(&bytes);
        prop_assert_eq!(err, None);
        prop_assert_eq!(decoded, frames);
    }

    #[test]
    fn prop_truncation_is_reported(f in frame(), cut in 1usize..4) {
        let bytes = f.to_bytes().unwrap();
        let cut = cut.min(bytes.len());
        let short = &bytes[..bytes.len() - cut];
        prop_assert!(decode_frame(short).is_err());
    }
}

/// Plays a short game touching every recorded frame kind. Returns the game
/// and how many frames it should have recorded.
fn recorded_game() -> (GameState, usize) {
    let (mut game, clock) = clocked_game(&ALICE_DECK, &DECK);
    let (alice, bob) = seats(&game);

    clock.advance(1200);
    play(&mut game, alice, "ethoslab_common", 0);
    clock.advance(500);
    play(&mut game, alice, "redstone_item_common", 0);
    // Waiting is never recorded
    act(&mut game, bob, TurnActionData::WaitForTurn);
    end_turn(&mut game);

    clock.advance(3000);
    play(&mut game, bob, "ethoslab_common", 0);
    play(&mut game, bob, "ethoslab_common", 1);
    play(&mut game, bob, "gold_armor", 0);
    act(&mut game, bob, TurnActionData::Delay { millis: 1500 });
    end_turn(&mut game);

    play(&mut game, alice, "knockback", 0);
    clock.advance(800);
    act(&mut game, alice, TurnActionData::PrimaryAttack);
    let slot = hermit_slot(&game, bob, 1);
    clock.advance(2500);
    act(&mut game, bob, TurnActionData::PickRequest { slot });
    end_turn(&mut game);

    let slot = hermit_slot(&game, bob, 0);
    act(&mut game, bob, TurnActionData::ChangeActiveHermit { slot });
    (game, 13)
}

#[test]
fn test_every_applied_action_is_recorded() {
    let (game, expected) = recorded_game();
    let (frames, err) = decode_frames(&game.replay_record().actions);
    assert_eq!(err, None);
    assert_eq!(frames.len(), expected);
    assert_eq!(frames[0].tenths, 12);
    assert_eq!(frames[1].tenths, 5);
    assert!(frames.iter().all(|f| f.action != TurnAction::WaitForTurn));
    assert!(frames.iter().any(|f| f.payload == Payload::Delay(1500)));
}

#[test]
fn test_replay_reproduces_the_game() {
    let (game, expected) = recorded_game();
    let (alice, bob) = seats(&game);
    let bytes = game.replay_record().to_bytes().unwrap();
    let record = ReplayRecord::from_bytes(&bytes).unwrap();

    let outcome = replay_game(&record, registry()).unwrap();
    assert_eq!(outcome.error, None);
    assert_eq!(outcome.frames.len(), expected);

    let replayed = outcome.game;
    assert_eq!(replayed.replay_record().actions, game.replay_record().actions);
    assert_eq!(replayed.turn, game.turn);
    for player in [alice, bob] {
        assert_eq!(replayed.player(player).unwrap().hand, game.player(player).unwrap().hand);
        assert_eq!(replayed.player(player).unwrap().discard, game.player(player).unwrap().discard);
        assert_eq!(replayed.active_row_of(player), game.active_row_of(player));
        for index in 0..5 {
            assert_eq!(health(&replayed, player, index), health(&game, player, index));
        }
    }
    assert_eq!(health(&replayed, bob, 0), Some(230));
}

#[test]
fn test_replay_stops_at_a_corrupt_frame() {
    let (game, expected) = recorded_game();
    let mut record = game.replay_record().clone();
    record.actions.extend_from_slice(&[0x42, 0x00, 0x00]);

    let outcome = replay_game(&record, registry()).unwrap();
    assert_eq!(outcome.frames.len(), expected);
    assert_eq!(outcome.error, Some(CodecError::UnknownOpcode(0x42)));
}

#[test]
fn test_replay_stops_at_a_rejected_action() {
    let (game, _) = clocked_game(&DECK, &DECK);
    let mut record = game.replay_record().clone();
    // Turn 1 cannot attack
    Frame::new(TurnAction::PrimaryAttack, 0, Payload::None)
        .encode(&mut record.actions)
        .unwrap();

    let outcome = replay_game(&record, registry()).unwrap();
    assert!(outcome.frames.is_empty());
    assert!(matches!(outcome.error, Some(CodecError::Rejected { .. })));
}
