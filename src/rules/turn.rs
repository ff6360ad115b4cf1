//! Applying turn actions.
//!
//! [`GameState::apply_turn_action`] is the single entry point: it rejects
//! anything outside [`available_actions`](GameState::available_actions)
//! before touching the game, dispatches the action, then settles the board
//! (knockouts, frozen slots, log flush) and records the action for replay.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::attacks::AttackRequest;
use crate::cards::{CardCategory, HermitAttackType};
use crate::components::{CardComponent, RowComponent, SlotComponent};
use crate::core::{EntityId, GameOutcome, GameState, PlayerId, TurnAction, TurnActionData, WinReason};
use crate::error::{EngineError, Result};
use crate::hooks::hook;
use crate::requests::ActionResult;

use super::actions::play_action_for;

impl GameState {
    /// Validate and apply one action submitted by `player`.
    ///
    /// Returns `Err` (and leaves the game untouched) for actions the player
    /// may not take right now. Otherwise returns the action's result; a
    /// non-success result means the action was understood but did nothing.
    pub fn apply_turn_action(&mut self, player: EntityId, data: TurnActionData) -> Result<ActionResult> {
        if self.is_over() {
            return Err(EngineError::GameOver);
        }
        if self.seat_of(player).is_none() {
            return Err(EngineError::WrongPlayer(player));
        }
        let action = data.kind();
        if action != TurnAction::Delay && !self.available_actions(player).contains(&action) {
            warn!(%player, %action, "rejected illegal action");
            return Err(EngineError::IllegalAction { action, player });
        }

        let frame = self.encode_for_replay(player, &data);

        let result = match data {
            TurnActionData::PlayHermitCard { card, slot }
            | TurnActionData::PlayItemCard { card, slot }
            | TurnActionData::PlayEffectCard { card, slot }
            | TurnActionData::PlaySingleUseCard { card, slot } => self.play_card(player, action, card, slot),
            TurnActionData::SingleUseAttack | TurnActionData::PrimaryAttack | TurnActionData::SecondaryAttack => {
                self.attack_action(player, action)
            }
            TurnActionData::EndTurn => {
                self.end_turn();
                ActionResult::Success
            }
            TurnActionData::ApplyEffect => {
                if self.apply_single_use(player, None) {
                    ActionResult::Success
                } else {
                    ActionResult::FailureCannotComplete
                }
            }
            TurnActionData::RemoveEffect => self.remove_single_use(player),
            TurnActionData::ChangeActiveHermit { slot } => self.change_active_hermit(player, slot),
            TurnActionData::PickRequest { slot } => self.answer_pick_request(player, slot),
            TurnActionData::ModalRequest { result } => self.answer_modal_request(player, &result),
            TurnActionData::WaitForTurn | TurnActionData::WaitForOpponentAction | TurnActionData::Delay { .. } => {
                ActionResult::Success
            }
        };
        debug!(%player, %action, ?result, "action applied");

        if result.is_success() {
            if let Some(frame) = frame {
                self.record_frame(&frame);
            }
        }

        self.settle();
        self.check_board_invariants()?;
        Ok(result)
    }

    /// Knockouts, frozen slots and the log, after anything that may have
    /// changed the board.
    pub(crate) fn settle(&mut self) {
        self.check_knockouts();
        self.refresh_frozen_slots();
        self.send_logs();
    }

    // === Card plays ===

    pub(crate) fn play_card(&mut self, player: EntityId, action: TurnAction, card: EntityId, slot: EntityId) -> ActionResult {
        let Some(hand_index) = self.player(player).and_then(|p| p.hand_index(card)) else {
            return ActionResult::FailureInvalidData;
        };
        let Some(c) = self.components.get::<CardComponent>(card) else {
            return ActionResult::FailureInvalidData;
        };
        let category = c.category();
        let condition = c.card.attach_condition();
        if play_action_for(category) != action {
            return ActionResult::FailureInvalidData;
        }
        let Some(s) = self.components.get::<SlotComponent>(slot) else {
            return ActionResult::FailureInvalidData;
        };
        if s.kind.accepts() != Some(category) {
            return ActionResult::FailureInvalidData;
        }
        if !condition.matches(self, s) {
            return ActionResult::FailureUnmetCondition;
        }
        let row = s.row;

        debug!(%card, %slot, hand_index, "playing card");
        if category == CardCategory::SingleUse {
            if let Some(p) = self.player_mut(player) {
                p.single_use_used = false;
            }
        }
        self.attach_card(card, slot);

        match category {
            CardCategory::Hermit => {
                if self.active_row_of(player).is_none() {
                    self.change_active_row(player, row);
                }
            }
            CardCategory::Item => self.turn.add_completed(&[TurnAction::PlayItemCard]),
            CardCategory::Attach | CardCategory::SingleUse => {}
        }
        // Single-use cards are logged when applied.
        if category != CardCategory::SingleUse {
            self.add_play_card_entry(card, None);
        }
        ActionResult::Success
    }

    fn remove_single_use(&mut self, player: EntityId) -> ActionResult {
        let Some(card) = self.single_use_card(player) else {
            return ActionResult::FailureCannotComplete;
        };
        self.return_to_hand(card);
        if let Some(p) = self.player_mut(player) {
            p.single_use_used = false;
        }
        ActionResult::Success
    }

    fn change_active_hermit(&mut self, player: EntityId, slot: EntityId) -> ActionResult {
        if !self.is_afk_hermit_slot(player, slot) {
            return ActionResult::FailureInvalidData;
        }
        let Some(row) = self.components.get::<SlotComponent>(slot).and_then(|s| s.row) else {
            return ActionResult::FailureInvalidData;
        };
        let old = self.active_hermit(player);
        self.change_active_row(player, Some(row));
        self.turn.add_completed(&[TurnAction::ChangeActiveHermit]);

        let new = self.hermit_in_row(row).map(|h| self.log_card_name(h)).unwrap_or_default();
        let name = self.player_name(player);
        let line = match old {
            Some(old) => {
                let old = self.components.get::<CardComponent>(old).map_or("", |c| c.props().name);
                format!("$p{{You|{name}}}$ swapped $p{old}$ for $p{new}$")
            }
            None => format!("$p{{You|{name}}}$ activated $p{new}$"),
        };
        self.add_custom_entry(player, line);
        ActionResult::Success
    }

    // === Attacks ===

    fn attack_action(&mut self, player: EntityId, action: TurnAction) -> ActionResult {
        let hermit = self.active_hermit(player);
        let kind = match action {
            TurnAction::PrimaryAttack => Some(HermitAttackType::Primary),
            TurnAction::SecondaryAttack => Some(HermitAttackType::Secondary),
            _ => None,
        };

        let mut attacks = Vec::new();
        if let Some(kind) = kind {
            let Some(h) = hermit else {
                return ActionResult::FailureCannotComplete;
            };
            let Some(card) = self.components.get::<CardComponent>(h).map(|c| Arc::clone(&c.card)) else {
                return ActionResult::FailureCannotComplete;
            };
            attacks.extend(card.get_attack(self, h, kind));
        }
        let mut request = AttackRequest { action, hermit };
        attacks.extend(self.call_hook(player, hook::get_attack, &mut request).into_iter().flatten());
        if attacks.is_empty() {
            return ActionResult::FailureCannotComplete;
        }

        let single_use = self
            .single_use_card(player)
            .filter(|&su| attacks.iter().any(|a| a.creator() == Some(su)));
        let resolved = self.execute_attacks(attacks, false);
        for attack in &resolved {
            if self.config.debug.log_attack_history {
                debug!(?attack, "attack history");
            }
            self.add_attack_entry(attack, single_use);
        }
        ActionResult::Success
    }

    // === Turns ===

    /// Finish the current player's turn and start the opponent's.
    pub(crate) fn end_turn(&mut self) {
        let Some(player) = self.current_player_entity() else {
            return;
        };
        self.call_hook(player, hook::on_turn_end, &mut ());
        self.check_knockouts();
        if self.is_over() {
            return;
        }

        if let Some(card) = self.single_use_card(player) {
            let used = self.player(player).is_some_and(|p| p.single_use_used);
            if used {
                self.discard_card(card);
            } else {
                self.return_to_hand(card);
            }
        }
        if let Some(p) = self.player_mut(player) {
            p.single_use_used = false;
            p.coin_flips.clear();
        }

        let wanted = self.config.turn_draw;
        if self.draw_cards(player, wanted) < wanted {
            self.lose(player, WinReason::DeckOut);
            self.send_logs();
            return;
        }

        self.add_turn_end_entry();
        self.send_logs();
        self.turn.clear();
        self.turn.turn_number += 1;
        self.turn.current = self.turn.current.opponent();
        self.start_turn();
    }

    /// Run the start of the current player's turn.
    pub(crate) fn start_turn(&mut self) {
        let Some(player) = self.current_player_entity() else {
            return;
        };
        info!(turn = self.turn.turn_number, %player, "turn started");
        self.refresh_frozen_slots();
        self.call_hook(player, hook::on_turn_start, &mut ());
        self.check_knockouts();

        // Both players have had a turn to place a hermit.
        if self.turn.turn_number > 2 && self.occupied_rows(player).is_empty() {
            self.lose(player, WinReason::NoHermits);
        }
    }

    // === Knockouts and outcome ===

    /// Take a life for every row whose health reached zero and discard its
    /// cards. Ends the game when a player runs out of lives.
    pub fn check_knockouts(&mut self) {
        if self.is_over() {
            return;
        }
        for seat in PlayerId::all() {
            let player = self.player_entity(seat);
            let rows = self.player(player).map(|p| p.rows.clone()).unwrap_or_default();
            for row in rows {
                if self.components.get::<RowComponent>(row).and_then(|r| r.health) != Some(0) {
                    continue;
                }
                self.knock_out(player, row);
            }
        }

        let out: Vec<PlayerId> = PlayerId::all()
            .filter(|&seat| self.player(self.player_entity(seat)).is_some_and(|p| p.lives == 0))
            .collect();
        match out.as_slice() {
            [] => {}
            [loser] => {
                self.end_game(GameOutcome::Winner {
                    winner: loser.opponent(),
                    reason: WinReason::Lives,
                });
            }
            _ => {
                self.end_game(GameOutcome::Tie);
            }
        }
    }

    fn knock_out(&mut self, player: EntityId, row: EntityId) {
        let hermit = self.hermit_in_row(row);
        if let Some(hermit) = hermit {
            if let Some(p) = self.player_mut(player) {
                p.lives = p.lives.saturating_sub(1);
            }
            info!(%player, %hermit, "hermit knocked out");
            self.add_death_entry(player, hermit);
        }

        let slots: Vec<EntityId> = self
            .components
            .get::<RowComponent>(row)
            .map(|r| r.slots().collect())
            .unwrap_or_default();
        for slot in slots {
            if let Some(card) = self.card_in_slot(slot) {
                self.discard_card(card);
            }
        }
        if let Some(r) = self.components.get_mut::<RowComponent>(row) {
            r.health = None;
        }
        if self.active_row_of(player) == Some(row) {
            self.change_active_row(player, None);
        }
    }

    fn lose(&mut self, player: EntityId, reason: WinReason) {
        let Some(seat) = self.seat_of(player) else {
            return;
        };
        self.end_game(GameOutcome::Winner {
            winner: seat.opponent(),
            reason,
        });
    }

    /// End the game in the opponent's favour. `reason` is normally
    /// [`WinReason::Forfeit`] or [`WinReason::Timeout`].
    pub fn forfeit(&mut self, player: EntityId, reason: WinReason) -> Result<()> {
        if self.is_over() {
            return Err(EngineError::GameOver);
        }
        if self.seat_of(player).is_none() {
            return Err(EngineError::WrongPlayer(player));
        }
        self.lose(player, reason);
        Ok(())
    }

    /// Resolve the open request through its timeout handler, then settle
    /// the board.
    pub fn timeout_active_request(&mut self) -> bool {
        let Some(id) = self.active_request().map(|r| r.id()) else {
            return false;
        };
        let resolved = self.timeout_request(id);
        self.settle();
        resolved
    }

    // === Invariants ===

    /// Rows hold health exactly while a hermit is in them. A violation ends
    /// the game with [`GameOutcome::Error`].
    pub(crate) fn check_board_invariants(&mut self) -> Result<()> {
        let broken = self.components.iter::<RowComponent>().find_map(|row| {
            let has_hermit = self.hermit_in_row(row.entity).is_some();
            match (has_hermit, row.health) {
                (true, None) => Some(format!("{} holds a hermit without health", row.entity)),
                (false, Some(_)) => Some(format!("{} has health but no hermit", row.entity)),
                _ => None,
            }
        });
        let Some(message) = broken else {
            return Ok(());
        };
        warn!(%message, "board invariant violated");
        self.end_game(GameOutcome::Error { message: message.clone() });
        Err(EngineError::Invariant(message))
    }
}

impl GameOutcome {
    #[must_use]
    pub fn is_winner(&self, seat: PlayerId) -> bool {
        matches!(self, GameOutcome::Winner { winner, .. } if *winner == seat)
    }
}
