//! Legal actions.
//!
//! While a request is open only the asked player may act, and only by
//! answering it. Otherwise the current player gets every action whose
//! preconditions hold and that is neither completed nor blocked this turn;
//! the other player waits.

use crate::cards::{CardCategory, HermitAttackType};
use crate::components::{CardComponent, SlotComponent};
use crate::core::{EntityId, GameState, TurnAction};
use crate::requests::Request;

/// The play action that puts a card of `category` into play.
#[must_use]
pub const fn play_action_for(category: CardCategory) -> TurnAction {
    match category {
        CardCategory::Hermit => TurnAction::PlayHermitCard,
        CardCategory::Item => TurnAction::PlayItemCard,
        CardCategory::Attach => TurnAction::PlayEffectCard,
        CardCategory::SingleUse => TurnAction::PlaySingleUseCard,
    }
}

impl GameState {
    /// Player expected to act next: whoever the open request asks, else
    /// the current player.
    #[must_use]
    pub fn acting_player(&self) -> Option<EntityId> {
        match self.active_request() {
            Some(request) => Some(request.player()),
            None => self.current_player_entity(),
        }
    }

    /// Slots `card` may be played into right now.
    #[must_use]
    pub fn playable_slots(&self, card: EntityId) -> Vec<EntityId> {
        let Some(c) = self.components.get::<CardComponent>(card) else {
            return Vec::new();
        };
        let category = c.category();
        let condition = c.card.attach_condition();
        self.filter(&condition)
            .into_iter()
            .filter(|s| s.kind.accepts() == Some(category))
            .map(|s| s.entity)
            .collect()
    }

    fn can_play(&self, player: EntityId, category: CardCategory) -> bool {
        let Some(p) = self.player(player) else {
            return false;
        };
        p.hand.iter().any(|&card| {
            self.components.get::<CardComponent>(card).is_some_and(|c| c.category() == category)
                && !self.playable_slots(card).is_empty()
        })
    }

    fn has_afk_hermit(&self, player: EntityId) -> bool {
        let active = self.active_row_of(player);
        self.occupied_rows(player).into_iter().any(|row| Some(row) != active)
    }

    /// `(has_attack, confirm)` of an unused single-use card.
    fn unused_single_use(&self, player: EntityId) -> Option<(bool, bool)> {
        if self.player(player)?.single_use_used {
            return None;
        }
        let card = self.single_use_card(player)?;
        let props = self.components.get::<CardComponent>(card)?.props().single_use().copied()?;
        Some((props.has_attack, props.confirm))
    }

    /// Actions `player` may submit now.
    pub fn available_actions(&mut self, player: EntityId) -> Vec<TurnAction> {
        if self.is_over() || self.seat_of(player).is_none() {
            return Vec::new();
        }
        if let Some(request) = self.active_request() {
            if request.player() != player {
                return vec![TurnAction::WaitForOpponentAction];
            }
            return match request {
                Request::Pick(_) => vec![TurnAction::PickRequest],
                Request::Modal(_) => vec![TurnAction::ModalRequest],
            };
        }
        if self.current_player_entity() != Some(player) {
            return vec![TurnAction::WaitForTurn];
        }

        let mut actions = Vec::new();
        for category in [
            CardCategory::Hermit,
            CardCategory::Item,
            CardCategory::Attach,
            CardCategory::SingleUse,
        ] {
            if self.can_play(player, category) {
                actions.push(play_action_for(category));
            }
        }

        if self.has_afk_hermit(player) {
            actions.push(TurnAction::ChangeActiveHermit);
        }

        let single_use = self.unused_single_use(player);
        if let Some((has_attack, confirm)) = single_use {
            if confirm {
                actions.push(TurnAction::ApplyEffect);
            }
            actions.push(TurnAction::RemoveEffect);
            if has_attack && self.active_hermit(player).is_some() && self.turn.turn_number > 1 {
                actions.push(TurnAction::SingleUseAttack);
            }
        }

        // The first player can't attack on the opening turn.
        if self.turn.turn_number > 1 && self.active_hermit(player).is_some() {
            if self.can_afford_attack(player, HermitAttackType::Primary) {
                actions.push(TurnAction::PrimaryAttack);
            }
            if self.can_afford_attack(player, HermitAttackType::Secondary) {
                actions.push(TurnAction::SecondaryAttack);
            }
        }

        actions.retain(|&a| !self.turn.is_completed(a) && !self.turn.is_blocked(a));
        actions.push(TurnAction::EndTurn);
        actions
    }

    /// Whether `slot` is one of `player`'s non-empty hermit slots outside
    /// the active row.
    pub(crate) fn is_afk_hermit_slot(&self, player: EntityId, slot: EntityId) -> bool {
        let Some(s) = self.components.get::<SlotComponent>(slot) else {
            return false;
        };
        s.player == player
            && s.kind == crate::components::SlotKind::Hermit
            && s.row.is_some()
            && s.row != self.active_row_of(player)
            && !self.is_slot_empty(slot)
    }
}
