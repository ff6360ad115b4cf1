//! Built-in cards.
//!
//! A representative set that exercises every part of the card contract:
//! plain and hook-driven hermits, typed items, armor and backlash attach
//! cards, and single-use cards with attacks, confirmations and picks.

mod attach;
mod hermits;
mod items;
mod single_use;

pub use items::item_props;

use std::sync::Arc;

use super::card::{Card, PlainCard};
use crate::components::SlotComponent;
use crate::core::{EntityId, GameState};
use crate::hooks::hook;
use crate::query::{self, slot, Query};
use crate::requests::{ActionResult, PickRequest, RequestId};

/// Every built-in card type.
#[must_use]
pub fn all() -> Vec<Arc<dyn Card>> {
    let mut cards: Vec<Arc<dyn Card>> = vec![
        Arc::new(PlainCard(hermits::ETHOSLAB_COMMON)),
        Arc::new(hermits::FalseSymmetryRare),
        Arc::new(hermits::IJevinRare),
        Arc::new(hermits::Iskall85Rare),
        Arc::new(hermits::DreamRare),
        Arc::new(hermits::XisumavoidRare),
        Arc::new(attach::GoldArmor),
        Arc::new(attach::IronArmor),
        Arc::new(attach::Thorns),
        Arc::new(attach::Furnace),
        Arc::new(single_use::IronSword),
        Arc::new(single_use::GoldenAxe),
        Arc::new(single_use::Knockback),
        Arc::new(single_use::InstantHealth),
        Arc::new(single_use::LavaBucket),
        Arc::new(single_use::SplashPotionOfPoison),
    ];
    cards.extend(item_props().into_iter().map(|p| Arc::new(PlainCard(p)) as Arc<dyn Card>));
    cards
}

/// AFK hermits of `player` that could become active.
#[must_use]
pub fn afk_hermit_slots(player: EntityId) -> Query<SlotComponent> {
    query::every([
        slot::player(player),
        slot::hermit(),
        query::not(slot::active()),
        query::not(slot::empty()),
    ])
}

/// Make `player` choose an AFK hermit as their new active hermit.
///
/// Nothing is queued when the player has no AFK hermits or one of their
/// cards blocks knockback. On timeout the first AFK hermit is chosen.
pub fn knockback_request(game: &mut GameState, creator: EntityId, player: EntityId) -> Option<RequestId> {
    let blocked = game.call_hook(player, hook::blocked_knockback, &mut ());
    if blocked.into_iter().any(|b| b) {
        return None;
    }

    let can_pick = afk_hermit_slots(player);
    let fallback = can_pick.clone();
    let request = PickRequest::new(
        player,
        creator,
        "Choose an AFK Hermit to set as your active Hermit",
        can_pick,
        move |game, picked| {
            let Some(row) = game.components.get::<SlotComponent>(picked).and_then(|s| s.row) else {
                return ActionResult::FailureInvalidData;
            };
            game.change_active_row(player, Some(row));
            ActionResult::Success
        },
    )
    .on_timeout(move |game| {
        if let Some(row) = game.find(&fallback).and_then(|s| s.row) {
            game.change_active_row(player, Some(row));
        }
    });
    game.add_pick_request(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let cards = all();
        let mut ids: Vec<_> = cards.iter().map(|c| c.props().id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cards.len());
    }
}
