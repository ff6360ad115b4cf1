//! Card movement and the board-level primitives cards call into.
//!
//! Moving a card onto a board slot attaches it: an observer is created and
//! the card's `on_attach` runs. Moving it off detaches it again: `on_detach`
//! runs with the same observer, status effects on the card are removed and
//! the observer is destroyed, taking every subscription with it.

use smallvec::SmallVec;
use tracing::debug;

use crate::components::{CardComponent, CoinFlip, CoinFlipRecord, RowComponent, SlotComponent};
use crate::core::{EntityId, GameState};
use crate::hooks::{hook, ActiveRowChange, CoinFlipEvent};

impl GameState {
    // === Attach / detach ===

    /// Put a card into a board slot and attach it.
    pub(crate) fn attach_card(&mut self, card: EntityId, slot: EntityId) {
        let Some(player) = self.card_player(card) else {
            return;
        };
        if let Some(p) = self.player_mut(player) {
            p.remove_from_piles(card);
        }
        let Some(c) = self.components.get_mut::<CardComponent>(card) else {
            return;
        };
        c.slot = slot;
        c.turned_over = false;
        let behavior = std::sync::Arc::clone(&c.card);

        if let Some(health) = behavior.props().health() {
            if let Some(row) = self.components.get::<SlotComponent>(slot).and_then(|s| s.row) {
                if let Some(r) = self.components.get_mut::<RowComponent>(row) {
                    r.health = Some(health);
                }
            }
        }

        let observer = self.new_observer(card);
        if let Some(c) = self.components.get_mut::<CardComponent>(card) {
            c.observer = Some(observer);
        }
        debug!(%card, %slot, id = behavior.props().id, "card attached");
        behavior.on_attach(self, card, observer);
        let mut attached = card;
        self.call_hook(player, hook::on_attach, &mut attached);
    }

    /// Tear down an attached card. No-op for cards that are not attached.
    pub(crate) fn detach_card(&mut self, card: EntityId) {
        let Some(c) = self.components.get::<CardComponent>(card) else {
            return;
        };
        let Some(observer) = c.observer else {
            return;
        };
        let behavior = std::sync::Arc::clone(&c.card);
        let player = c.player;

        behavior.on_detach(self, card, observer);
        let mut detached = card;
        self.call_hook(player, hook::on_detach, &mut detached);
        self.remove_status_effects_on(card);
        self.destroy_observer(observer);
        if let Some(c) = self.components.get_mut::<CardComponent>(card) {
            c.observer = None;
        }
        debug!(%card, "card detached");
    }

    /// Clear the row's health if `card` is the hermit holding it.
    fn vacate_row(&mut self, card: EntityId) {
        let Some(row) = self.row_of_card(card) else {
            return;
        };
        if self.hermit_in_row(row) != Some(card) {
            return;
        }
        if let Some(r) = self.components.get_mut::<RowComponent>(row) {
            r.health = None;
        }
    }

    // === Piles ===

    /// Move a card to its owner's discard pile, detaching it first.
    pub fn discard_card(&mut self, card: EntityId) {
        self.detach_card(card);
        self.vacate_row(card);
        let Some(player) = self.card_player(card) else {
            return;
        };
        let Some(p) = self.player_mut(player) else {
            return;
        };
        p.remove_from_piles(card);
        p.discard.push(card);
        let discard_slot = p.discard_slot;
        if let Some(c) = self.components.get_mut::<CardComponent>(card) {
            c.slot = discard_slot;
        }
    }

    /// Move a card back to its owner's hand, detaching it first.
    pub fn return_to_hand(&mut self, card: EntityId) {
        self.detach_card(card);
        self.vacate_row(card);
        let Some(player) = self.card_player(card) else {
            return;
        };
        let Some(p) = self.player_mut(player) else {
            return;
        };
        p.remove_from_piles(card);
        p.hand.push(card);
        let hand_slot = p.hand_slot;
        if let Some(c) = self.components.get_mut::<CardComponent>(card) {
            c.slot = hand_slot;
        }
    }

    /// Draw up to `count` cards from the top of the deck. Returns the
    /// number actually drawn.
    pub fn draw_cards(&mut self, player: EntityId, count: usize) -> usize {
        let Some(p) = self.player_mut(player) else {
            return 0;
        };
        let drawn: Vec<EntityId> = p.deck.drain(..count.min(p.deck.len())).collect();
        p.hand.extend(&drawn);
        let hand_slot = p.hand_slot;
        for &card in &drawn {
            if let Some(c) = self.components.get_mut::<CardComponent>(card) {
                c.slot = hand_slot;
            }
        }
        drawn.len()
    }

    // === Rows ===

    /// Heal a row, capped at the larger of its current health and its
    /// hermit's base health. Returns the amount healed.
    pub fn heal_row(&mut self, row: EntityId, amount: u32) -> u32 {
        let base = self
            .hermit_in_row(row)
            .and_then(|h| self.components.get::<CardComponent>(h))
            .and_then(|c| c.props().health())
            .unwrap_or(0);
        let Some(r) = self.components.get_mut::<RowComponent>(row) else {
            return 0;
        };
        let Some(current) = r.health else {
            return 0;
        };
        let healed = current.saturating_add(amount).min(base.max(current));
        r.health = Some(healed);
        healed - current
    }

    /// Make `row` the active row of `player` and notify their hooks.
    pub fn change_active_row(&mut self, player: EntityId, row: Option<EntityId>) {
        let Some(p) = self.player_mut(player) else {
            return;
        };
        let old = p.active_row;
        if old == row {
            return;
        }
        p.active_row = row;
        debug!(%player, ?old, ?row, "active row changed");
        self.call_hook(player, hook::on_active_row_change, &mut ActiveRowChange { old, new: row });
    }

    // === Coin flips ===

    /// Flip `times` coins for `card` and record them on its owner.
    pub fn flip_coin(&mut self, card: EntityId, times: usize) -> SmallVec<[CoinFlip; 4]> {
        let Some(player) = self.card_player(card) else {
            return SmallVec::new();
        };
        let forced = self.config.debug.force_coin_flip;
        let tosses = (0..times)
            .map(|_| {
                if forced || self.rng_mut().coin_flip() {
                    CoinFlip::Heads
                } else {
                    CoinFlip::Tails
                }
            })
            .collect();

        let mut event = CoinFlipEvent { card, tosses };
        self.call_hook(player, hook::on_coin_flip, &mut event);

        let opponent_flip = self.current_player_entity() != Some(player);
        if let Some(p) = self.player_mut(player) {
            p.coin_flips.push(CoinFlipRecord {
                card,
                opponent_flip,
                tosses: event.tosses.clone(),
            });
        }
        debug!(%card, tosses = ?event.tosses, "coin flipped");
        event.tosses
    }

    // === Single use ===

    /// Apply `player`'s single-use card. Returns `false` if there is none
    /// or it was already applied.
    pub fn apply_single_use(&mut self, player: EntityId, pick: Option<EntityId>) -> bool {
        let Some(card) = self.single_use_card(player) else {
            return false;
        };
        match self.player_mut(player) {
            Some(p) if !p.single_use_used => p.single_use_used = true,
            _ => return false,
        }
        debug!(%card, "single use applied");
        self.call_hook(player, hook::on_apply, &mut ());
        self.add_play_card_entry(card, pick);
        true
    }
}
