//! Hook and observer integration tests, using test-only cards registered
//! next to the built-in catalogue.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use common::*;
use hc_engine::cards::{CardKind, Rarity};
use hc_engine::components::CardComponent;
use hc_engine::hooks::hook;
use hc_engine::{Card, CardProps, CardRegistry, EntityId, GameConfig, GameState, TurnActionData};

const fn test_attach(id: &'static str, numeric_id: u16) -> CardProps {
    CardProps {
        id,
        numeric_id,
        name: id,
        expansion: "test",
        rarity: Rarity::Common,
        tokens: 0,
        description: "",
        kind: CardKind::Attach,
    }
}

static TALLY: CardProps = test_attach("tally", 9001);
static SABOTEUR: CardProps = test_attach("saboteur", 9002);
static RECORDER: CardProps = test_attach("recorder", 9003);

#[derive(Default)]
struct Counts {
    attached: AtomicUsize,
    detached: AtomicUsize,
    turn_ends: AtomicUsize,
    observers: Mutex<Vec<EntityId>>,
}

/// Counts its lifecycle calls and the owner's turn ends.
struct Tally(Arc<Counts>);

impl Card for Tally {
    fn props(&self) -> &CardProps {
        &TALLY
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        self.0.attached.fetch_add(1, Ordering::SeqCst);
        self.0.observers.lock().unwrap().push(observer);
        let Some(player) = game.card_player(card) else {
            return;
        };
        let counts = Arc::clone(&self.0);
        game.subscribe(observer, player, hook::on_turn_end, move |_, _| {
            counts.turn_ends.fetch_add(1, Ordering::SeqCst);
        });
    }

    fn on_detach(&self, _game: &mut GameState, _card: EntityId, observer: EntityId) {
        self.0.detached.fetch_add(1, Ordering::SeqCst);
        self.0.observers.lock().unwrap().push(observer);
    }
}

/// Discards every attached tally at the end of its owner's turn.
struct Saboteur;

impl Card for Saboteur {
    fn props(&self) -> &CardProps {
        &SABOTEUR
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        game.subscribe(observer, player, hook::on_turn_end, |game, _| {
            let tallies: Vec<EntityId> = game
                .components
                .iter::<CardComponent>()
                .filter(|c| c.id() == "tally" && c.is_attached())
                .map(|c| c.entity)
                .collect();
            for tally in tallies {
                game.discard_card(tally);
            }
        });
    }
}

/// Records the attack pipeline phases it sees.
struct Recorder(Arc<Mutex<Vec<&'static str>>>);

impl Card for Recorder {
    fn props(&self) -> &CardProps {
        &RECORDER
    }

    fn on_attach(&self, game: &mut GameState, card: EntityId, observer: EntityId) {
        let Some(player) = game.card_player(card) else {
            return;
        };
        let Some(opponent) = game.opponent_of(player) else {
            return;
        };
        let log = |name: &'static str, seen: &Arc<Mutex<Vec<&'static str>>>| {
            let seen = Arc::clone(seen);
            move |_: &mut GameState, _: &mut hc_engine::attacks::AttackModel| seen.lock().unwrap().push(name)
        };
        game.subscribe(observer, player, hook::before_attack, log("before_attack", &self.0));
        game.subscribe(observer, opponent, hook::before_defence, log("before_defence", &self.0));
        game.subscribe(observer, player, hook::on_attack, log("on_attack", &self.0));
        game.subscribe(observer, opponent, hook::on_defence, log("on_defence", &self.0));
        game.subscribe(observer, player, hook::after_attack, log("after_attack", &self.0));
        game.subscribe(observer, opponent, hook::after_defence, log("after_defence", &self.0));
    }
}

struct Fixture {
    game: GameState,
    counts: Arc<Counts>,
    phases: Arc<Mutex<Vec<&'static str>>>,
}

fn fixture() -> Fixture {
    let counts = Arc::new(Counts::default());
    let phases = Arc::new(Mutex::new(Vec::new()));
    let mut registry = CardRegistry::with_builtin();
    registry.register(Arc::new(Tally(Arc::clone(&counts))));
    registry.register(Arc::new(Saboteur));
    registry.register(Arc::new(Recorder(Arc::clone(&phases))));

    let mut deck = vec!["ethoslab_common", "ethoslab_common", "saboteur", "tally", "recorder", "redstone_item_common"];
    deck.extend(DECK);
    let game = game_from(Arc::new(registry), GameConfig::default(), &deck, &deck);
    Fixture { game, counts, phases }
}

#[test]
fn test_attach_and_detach_once_with_the_same_observer() {
    let Fixture { mut game, counts, .. } = fixture();
    let (alice, _) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    let tally = play(&mut game, alice, "tally", 0);
    game.discard_card(tally);
    game.discard_card(tally);

    assert_eq!(counts.attached.load(Ordering::SeqCst), 1);
    assert_eq!(counts.detached.load(Ordering::SeqCst), 1);
    let observers = counts.observers.lock().unwrap();
    assert_eq!(observers.len(), 2);
    assert_eq!(observers[0], observers[1]);
}

#[test]
fn test_detached_card_stops_listening_the_same_turn() {
    let Fixture { mut game, counts, .. } = fixture();
    let (alice, _) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    let tally = play(&mut game, alice, "tally", 0);

    game.call_hook(alice, hook::on_turn_end, &mut ());
    assert_eq!(counts.turn_ends.load(Ordering::SeqCst), 1);

    game.return_to_hand(tally);
    game.call_hook(alice, hook::on_turn_end, &mut ());
    assert_eq!(counts.turn_ends.load(Ordering::SeqCst), 1);
    assert!(game.player(alice).unwrap().hooks.on_turn_end.is_empty());
}

#[test]
fn test_card_removed_mid_dispatch_is_skipped() {
    let Fixture { mut game, counts, .. } = fixture();
    let (alice, _) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    play(&mut game, alice, "ethoslab_common", 1);
    play(&mut game, alice, "saboteur", 0);
    let tally = play(&mut game, alice, "tally", 1);

    end_turn(&mut game);
    assert_eq!(counts.turn_ends.load(Ordering::SeqCst), 0);
    assert_eq!(counts.detached.load(Ordering::SeqCst), 1);
    assert!(game.player(alice).unwrap().discard.contains(&tally));
}

#[test]
fn test_pipeline_phase_order() {
    let Fixture { mut game, phases, .. } = fixture();
    let (alice, bob) = seats(&game);
    play(&mut game, alice, "ethoslab_common", 0);
    play(&mut game, alice, "redstone_item_common", 0);
    play(&mut game, alice, "recorder", 0);
    end_turn(&mut game);
    play(&mut game, bob, "ethoslab_common", 0);
    end_turn(&mut game);

    act(&mut game, alice, TurnActionData::PrimaryAttack);
    assert_eq!(
        *phases.lock().unwrap(),
        vec!["before_attack", "before_defence", "on_attack", "on_defence", "after_attack", "after_defence"]
    );
}

#[test]
fn test_active_row_change_hook() {
    let Fixture { mut game, .. } = fixture();
    let (alice, _) = seats(&game);
    let observer = game.new_observer(alice);
    game.subscribe(observer, alice, hook::on_active_row_change, move |game, change| {
        let moved = change.new;
        game.update_observer_state::<Vec<Option<EntityId>>, _>(observer, |seen| seen.push(moved));
    });

    play(&mut game, alice, "ethoslab_common", 0);
    play(&mut game, alice, "ethoslab_common", 1);
    let slot = {
        let r = row(&game, alice, 1);
        game.components.get::<hc_engine::components::RowComponent>(r).unwrap().hermit_slot
    };
    act(&mut game, alice, TurnActionData::ChangeActiveHermit { slot });

    let seen = game.observer_state::<Vec<Option<EntityId>>>(observer);
    assert_eq!(seen, vec![Some(row(&game, alice, 0)), Some(row(&game, alice, 1))]);
}
