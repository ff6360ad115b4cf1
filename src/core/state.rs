//! Game state.
//!
//! `GameState` owns everything about one game: the component store, turn
//! bookkeeping, the request queue, the battle log and chat, and the RNG.
//! Behavior lives in `impl GameState` blocks spread over the modules that
//! own each concern (hooks, attacks, requests, rules, ...); this file holds
//! the data and the board lookups everything else builds on.
//!
//! ## Seats and entities
//!
//! Both players exist from construction. A seat (`PlayerId`) maps to the
//! player's entity; everything on the board refers to players by entity.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::action::TurnAction;
use super::config::GameConfig;
use super::entity::EntityId;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{CardRegistry, HermitType};
use crate::components::{
    CardComponent, ComponentStore, PlayerComponent, RowComponent, SlotComponent, SlotKind,
};
use crate::hooks::{hook, SubscriptionId};
use crate::log::{BattleLog, ChatMessage, Clock, SystemClock};
use crate::query::Query;
use crate::replay::ReplayRecord;
use crate::requests::RequestQueue;

/// Completed and blocked actions of the current turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnState {
    /// Starts at 1.
    pub turn_number: u32,
    pub current: PlayerId,
    completed: Vec<TurnAction>,
    /// Blocked actions with the entity that blocked them (`None` for the
    /// engine).
    blocked: Vec<(Option<EntityId>, TurnAction)>,
}

impl TurnState {
    fn new() -> Self {
        Self {
            turn_number: 1,
            current: PlayerId::FIRST,
            completed: Vec::new(),
            blocked: Vec::new(),
        }
    }

    pub fn add_completed(&mut self, actions: &[TurnAction]) {
        for &action in actions {
            if !self.completed.contains(&action) {
                self.completed.push(action);
            }
        }
    }

    #[must_use]
    pub fn is_completed(&self, action: TurnAction) -> bool {
        self.completed.contains(&action)
    }

    pub fn block(&mut self, source: Option<EntityId>, actions: &[TurnAction]) {
        for &action in actions {
            if !self.blocked.contains(&(source, action)) {
                self.blocked.push((source, action));
            }
        }
    }

    /// Lift every block placed by `source`.
    pub fn unblock(&mut self, source: Option<EntityId>) {
        self.blocked.retain(|(s, _)| *s != source);
    }

    #[must_use]
    pub fn is_blocked(&self, action: TurnAction) -> bool {
        self.blocked.iter().any(|(_, a)| *a == action)
    }

    pub fn completed(&self) -> &[TurnAction] {
        &self.completed
    }

    /// Forget this turn's bookkeeping.
    pub fn clear(&mut self) {
        self.completed.clear();
        self.blocked.clear();
    }
}

/// Why a game was won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    /// The loser ran out of lives.
    Lives,
    /// The loser could not draw.
    DeckOut,
    /// The loser had no hermit on the board at the start of their turn.
    NoHermits,
    Forfeit,
    Timeout,
}

/// How a game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameOutcome {
    Winner { winner: PlayerId, reason: WinReason },
    Tie,
    /// An engine invariant broke; the game was stopped.
    Error { message: String },
}

/// Complete state of one game.
#[derive(Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub registry: Arc<CardRegistry>,
    pub components: ComponentStore,
    seats: PlayerMap<EntityId>,
    pub turn: TurnState,
    pub requests: RequestQueue,
    /// Entries waiting for the next `send_logs`.
    pub battle_log: BattleLog,
    pub chat: im::Vector<ChatMessage>,
    pub clock: Arc<dyn Clock>,
    rng: GameRng,
    outcome: Option<GameOutcome>,
    next_subscription: u64,
    /// Slot queries returned by `freeze_slots` hooks, see
    /// [`refresh_frozen_slots`](Self::refresh_frozen_slots).
    frozen: Vec<Query<SlotComponent>>,
    pub(crate) replay: ReplayRecord,
    /// Clock reading at the last recorded action.
    pub(crate) last_action_at: u64,
}

impl GameState {
    /// Create a game with both players seated and their boards laid out.
    ///
    /// Decks are dealt by [`GameBuilder`](crate::rules::GameBuilder).
    #[must_use]
    pub fn new(config: GameConfig, registry: Arc<CardRegistry>, seed: u64, names: [String; 2]) -> Self {
        Self::with_clock(config, registry, seed, names, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(
        config: GameConfig,
        registry: Arc<CardRegistry>,
        seed: u64,
        names: [String; 2],
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut components = ComponentStore::new();
        let [first, second] = names.clone();
        let seats = PlayerMap::new(|seat| {
            let name = if seat == PlayerId::FIRST { first.clone() } else { second.clone() };
            create_player(&mut components, &config, seat, name)
        });
        let now = clock.now_millis();

        Self {
            replay: ReplayRecord::new(seed, names, config.clone()),
            config,
            registry,
            components,
            seats,
            turn: TurnState::new(),
            requests: RequestQueue::default(),
            battle_log: BattleLog::default(),
            chat: im::Vector::new(),
            clock,
            rng: GameRng::new(seed),
            outcome: None,
            next_subscription: 0,
            frozen: Vec::new(),
            last_action_at: now,
        }
    }

    // === RNG ===

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub(crate) fn next_subscription_id(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }

    // === Outcome ===

    #[must_use]
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// End the game. Only the first call has any effect; returns whether
    /// this call ended it.
    pub fn end_game(&mut self, outcome: GameOutcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        info!(?outcome, turn = self.turn.turn_number, "game over");
        self.requests.clear();
        self.outcome = Some(outcome);
        true
    }

    // === Players ===

    #[must_use]
    pub fn player_entity(&self, seat: PlayerId) -> EntityId {
        self.seats[seat]
    }

    #[must_use]
    pub fn seat_of(&self, player: EntityId) -> Option<PlayerId> {
        self.seats.position(|&e| e == player)
    }

    #[must_use]
    pub fn current_player_entity(&self) -> Option<EntityId> {
        Some(self.seats[self.turn.current])
    }

    #[must_use]
    pub fn opponent_player_entity(&self) -> Option<EntityId> {
        Some(self.seats[self.turn.current.opponent()])
    }

    #[must_use]
    pub fn opponent_of(&self, player: EntityId) -> Option<EntityId> {
        self.seat_of(player).map(|seat| self.seats[seat.opponent()])
    }

    #[must_use]
    pub fn player(&self, player: EntityId) -> Option<&PlayerComponent> {
        self.components.get::<PlayerComponent>(player)
    }

    pub fn player_mut(&mut self, player: EntityId) -> Option<&mut PlayerComponent> {
        self.components.get_mut::<PlayerComponent>(player)
    }

    #[must_use]
    pub fn player_name(&self, player: EntityId) -> String {
        self.player(player).map(|p| p.name.clone()).unwrap_or_default()
    }

    /// Owner of a card.
    #[must_use]
    pub fn card_player(&self, card: EntityId) -> Option<EntityId> {
        self.components.get::<CardComponent>(card).map(|c| c.player)
    }

    // === Board lookups ===

    #[must_use]
    pub fn active_row_of(&self, player: EntityId) -> Option<EntityId> {
        self.player(player)?.active_row
    }

    /// The card in a board slot, or the top card of a pile.
    #[must_use]
    pub fn card_in_slot(&self, slot: EntityId) -> Option<EntityId> {
        let s = self.components.get::<SlotComponent>(slot)?;
        if s.kind.is_pile() {
            let p = self.player(s.player)?;
            return match s.kind {
                SlotKind::Hand => p.hand.first().copied(),
                SlotKind::Deck => p.deck.first().copied(),
                _ => p.discard.last().copied(),
            };
        }
        self.components
            .iter::<CardComponent>()
            .find(|c| c.slot == slot)
            .map(|c| c.entity)
    }

    #[must_use]
    pub fn is_slot_empty(&self, slot: EntityId) -> bool {
        self.card_in_slot(slot).is_none()
    }

    #[must_use]
    pub fn row_of_card(&self, card: EntityId) -> Option<EntityId> {
        let slot = self.components.get::<CardComponent>(card)?.slot;
        self.components.get::<SlotComponent>(slot)?.row
    }

    #[must_use]
    pub fn hermit_in_row(&self, row: EntityId) -> Option<EntityId> {
        let slot = self.components.get::<RowComponent>(row)?.hermit_slot;
        self.card_in_slot(slot)
    }

    #[must_use]
    pub fn active_hermit(&self, player: EntityId) -> Option<EntityId> {
        self.hermit_in_row(self.active_row_of(player)?)
    }

    #[must_use]
    pub fn hermit_type_of(&self, card: EntityId) -> Option<HermitType> {
        let c = self.components.get::<CardComponent>(card)?;
        c.props().hermit().map(|h| h.hermit_type)
    }

    /// The card in `player`'s single-use slot.
    #[must_use]
    pub fn single_use_card(&self, player: EntityId) -> Option<EntityId> {
        self.card_in_slot(self.player(player)?.single_use_slot)
    }

    /// Rows of `player` holding a hermit.
    #[must_use]
    pub fn occupied_rows(&self, player: EntityId) -> Vec<EntityId> {
        let Some(p) = self.player(player) else {
            return Vec::new();
        };
        p.rows
            .iter()
            .copied()
            .filter(|&row| self.hermit_in_row(row).is_some())
            .collect()
    }

    // === Frozen slots ===

    /// Queries of the slots frozen by cards in play.
    #[must_use]
    pub fn frozen_slots(&self) -> &[Query<SlotComponent>] {
        &self.frozen
    }

    /// Recompute the frozen set from both players' `freeze_slots` hooks.
    pub fn refresh_frozen_slots(&mut self) {
        self.frozen.clear();
        let mut frozen = Vec::new();
        for seat in PlayerId::all() {
            let player = self.seats[seat];
            frozen.extend(self.call_hook(player, hook::freeze_slots, &mut ()));
        }
        self.frozen = frozen;
    }
}

/// Create a player with their piles, rows and single-use slot.
fn create_player(components: &mut ComponentStore, config: &GameConfig, seat: PlayerId, name: String) -> EntityId {
    let player = components.allocate();
    let slot = |components: &mut ComponentStore, kind: SlotKind, row: Option<EntityId>, index: u8| {
        components.create(|entity| SlotComponent {
            entity,
            kind,
            player,
            row,
            index,
        })
    };

    let hand_slot = slot(components, SlotKind::Hand, None, 0);
    let deck_slot = slot(components, SlotKind::Deck, None, 0);
    let discard_slot = slot(components, SlotKind::Discard, None, 0);
    let single_use_slot = slot(components, SlotKind::SingleUse, None, 0);

    let mut rows = Vec::with_capacity(usize::from(config.rows));
    for index in 0..config.rows {
        let row = components.allocate();
        let hermit_slot = slot(components, SlotKind::Hermit, Some(row), 0);
        let attach_slot = slot(components, SlotKind::Attach, Some(row), 0);
        let item_slots = (0..config.item_slots)
            .map(|i| slot(components, SlotKind::Item, Some(row), i))
            .collect();
        components.insert(RowComponent {
            entity: row,
            player,
            index,
            health: None,
            hermit_slot,
            attach_slot,
            item_slots,
        });
        rows.push(row);
    }

    components.insert(PlayerComponent {
        entity: player,
        seat,
        name,
        hand: Vec::new(),
        deck: Vec::new(),
        discard: Vec::new(),
        hand_slot,
        deck_slot,
        discard_slot,
        rows,
        single_use_slot,
        active_row: None,
        single_use_used: false,
        lives: config.lives,
        coin_flips: Vec::new(),
        hooks: Box::default(),
    });
    player
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("turn", &self.turn)
            .field("seats", &self.seats)
            .field("requests", &self.requests.len())
            .field("outcome", &self.outcome)
            .field("entities", &self.components.allocated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::two_player_game;

    #[test]
    fn test_turn_state_bookkeeping() {
        let mut turn = TurnState::new();
        let effect = Some(EntityId(3));
        turn.add_completed(&[TurnAction::PlayItemCard, TurnAction::PlayItemCard]);
        turn.block(effect, &[TurnAction::PrimaryAttack]);
        turn.block(None, &[TurnAction::PrimaryAttack]);

        assert_eq!(turn.completed(), &[TurnAction::PlayItemCard]);
        assert!(turn.is_blocked(TurnAction::PrimaryAttack));
        turn.unblock(None);
        assert!(turn.is_blocked(TurnAction::PrimaryAttack));
        turn.unblock(effect);
        assert!(!turn.is_blocked(TurnAction::PrimaryAttack));

        turn.clear();
        assert!(!turn.is_completed(TurnAction::PlayItemCard));
    }

    #[test]
    fn test_seats() {
        let game = two_player_game();
        let first = game.player_entity(PlayerId::FIRST);
        let second = game.player_entity(PlayerId::SECOND);

        assert_ne!(first, second);
        assert_eq!(game.seat_of(second), Some(PlayerId::SECOND));
        assert_eq!(game.opponent_of(first), Some(second));
        assert_eq!(game.current_player_entity(), Some(first));
        assert_eq!(game.opponent_player_entity(), Some(second));
    }

    #[test]
    fn test_board_layout() {
        let game = two_player_game();
        let player = game.player(game.player_entity(PlayerId::FIRST)).unwrap();
        assert_eq!(player.rows.len(), 5);
        let row = game.components.get::<RowComponent>(player.rows[2]).unwrap();
        assert_eq!(row.index, 2);
        assert_eq!(row.item_slots.len(), 3);
        assert_eq!(row.health, None);
        assert!(game.is_slot_empty(row.hermit_slot));
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let mut game = two_player_game();
        let first = GameOutcome::Tie;
        let second = GameOutcome::Winner {
            winner: PlayerId::FIRST,
            reason: WinReason::Forfeit,
        };
        assert!(game.end_game(first.clone()));
        assert!(!game.end_game(second));
        assert_eq!(game.outcome(), Some(&first));
    }
}
