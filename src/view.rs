//! Per-player views of a game.
//!
//! A [`PlayerView`] is what one player is allowed to see: their own hand,
//! both boards, pile sizes and the open request if it is theirs. The
//! opponent's hand and both decks are reduced to counts, and a request
//! addressed to the opponent only shows up as `opponent_busy`.

use serde::{Deserialize, Serialize};

use crate::cards::CardCategory;
use crate::components::{
    CardComponent, CoinFlipRecord, RowComponent, SlotComponent, SlotKind, StatusEffectComponent,
};
use crate::core::{EntityId, GameOutcome, GameState, PlayerId, TurnAction};
use crate::requests::{ModalData, Request, RequestId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffectView {
    pub entity: EntityId,
    pub id: String,
    pub counter: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub entity: EntityId,
    pub id: String,
    pub name: String,
    pub category: CardCategory,
    pub turned_over: bool,
    pub status_effects: Vec<StatusEffectView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub entity: EntityId,
    pub kind: SlotKind,
    pub card: Option<CardView>,
    pub frozen: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowView {
    pub entity: EntityId,
    pub index: u8,
    pub health: Option<u32>,
    pub hermit: SlotView,
    pub attach: SlotView,
    pub items: Vec<SlotView>,
}

/// One side of the board, as anyone may see it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub entity: EntityId,
    pub seat: PlayerId,
    pub name: String,
    pub lives: u8,
    pub hand_size: usize,
    pub deck_size: usize,
    pub discard: Vec<CardView>,
    pub rows: Vec<RowView>,
    pub active_row: Option<u8>,
    pub single_use: SlotView,
    pub single_use_used: bool,
    /// Effects on the player rather than on a card.
    pub status_effects: Vec<StatusEffectView>,
    pub coin_flips: Vec<CoinFlipRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestView {
    Pick {
        id: RequestId,
        creator: EntityId,
        message: String,
        pickable: Vec<EntityId>,
    },
    Modal {
        id: RequestId,
        creator: EntityId,
        data: ModalData,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub viewer: EntityId,
    pub turn_number: u32,
    pub current_player: PlayerId,
    pub hand: Vec<CardView>,
    pub me: BoardView,
    pub opponent: BoardView,
    pub available_actions: Vec<TurnAction>,
    /// The open request, when it is addressed to the viewer.
    pub request: Option<RequestView>,
    /// The opponent is answering a request.
    pub opponent_busy: bool,
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// What `player` may see. `None` for an entity that is not a player of
    /// this game.
    ///
    /// Needs `&mut self` because legal actions consult energy hooks.
    pub fn view_for(&mut self, player: EntityId) -> Option<PlayerView> {
        let opponent = self.opponent_of(player)?;
        let available_actions = self.available_actions(player);

        let (request, opponent_busy) = match self.active_request() {
            Some(r) if r.player() == player => (Some(self.request_view(r)), false),
            Some(_) => (None, true),
            None => (None, false),
        };
        let hand = self
            .player(player)?
            .hand
            .iter()
            .filter_map(|&card| self.card_view(card))
            .collect();

        Some(PlayerView {
            viewer: player,
            turn_number: self.turn.turn_number,
            current_player: self.turn.current,
            hand,
            me: self.board_view(player)?,
            opponent: self.board_view(opponent)?,
            available_actions,
            request,
            opponent_busy,
            outcome: self.outcome().cloned(),
        })
    }

    fn request_view(&self, request: &Request) -> RequestView {
        match request {
            Request::Pick(pick) => RequestView::Pick {
                id: pick.id,
                creator: pick.creator,
                message: pick.message.clone(),
                pickable: self.pickable_slots(),
            },
            Request::Modal(modal) => RequestView::Modal {
                id: modal.id,
                creator: modal.creator,
                data: modal.data.clone(),
            },
        }
    }

    fn effect_views(&self, target: EntityId) -> Vec<StatusEffectView> {
        self.components
            .iter::<StatusEffectComponent>()
            .filter(|e| e.target.entity() == target)
            .map(|e| StatusEffectView {
                entity: e.entity,
                id: e.id().to_string(),
                counter: e.counter,
            })
            .collect()
    }

    fn card_view(&self, card: EntityId) -> Option<CardView> {
        let c = self.components.get::<CardComponent>(card)?;
        Some(CardView {
            entity: card,
            id: c.id().to_string(),
            name: c.props().name.to_string(),
            category: c.category(),
            turned_over: c.turned_over,
            status_effects: self.effect_views(card),
        })
    }

    fn slot_view(&self, slot: EntityId) -> Option<SlotView> {
        let s = self.components.get::<SlotComponent>(slot)?;
        Some(SlotView {
            entity: slot,
            kind: s.kind,
            card: self.card_in_slot(slot).and_then(|c| self.card_view(c)),
            frozen: self.frozen_slots().iter().any(|q| q.matches(self, s)),
        })
    }

    fn row_view(&self, row: EntityId) -> Option<RowView> {
        let r = self.components.get::<RowComponent>(row)?;
        Some(RowView {
            entity: row,
            index: r.index,
            health: r.health,
            hermit: self.slot_view(r.hermit_slot)?,
            attach: self.slot_view(r.attach_slot)?,
            items: r.item_slots.iter().filter_map(|&s| self.slot_view(s)).collect(),
        })
    }

    fn board_view(&self, player: EntityId) -> Option<BoardView> {
        let p = self.player(player)?;
        let active_row = p
            .active_row
            .and_then(|r| self.components.get::<RowComponent>(r))
            .map(|r| r.index);
        Some(BoardView {
            entity: player,
            seat: p.seat,
            name: p.name.clone(),
            lives: p.lives,
            hand_size: p.hand.len(),
            deck_size: p.deck.len(),
            discard: p.discard.iter().filter_map(|&c| self.card_view(c)).collect(),
            rows: p.rows.iter().filter_map(|&r| self.row_view(r)).collect(),
            active_row,
            single_use: self.slot_view(p.single_use_slot)?,
            single_use_used: p.single_use_used,
            status_effects: self.effect_views(player),
            coin_flips: p.coin_flips.clone(),
        })
    }
}
