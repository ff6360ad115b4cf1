//! Battle log: player-relative narration of what happened.
//!
//! Entries are queued while an action resolves and flushed into the chat
//! by [`GameState::send_logs`]. Attack and card-play entries go to the
//! front of the queue, everything else to the back.
//!
//! Text uses the inline markup of the chat layer:
//!
//! | Markup     | Meaning                          |
//! |------------|----------------------------------|
//! | `$p...$`   | the viewer's own card or name    |
//! | `$o...$`   | the opponent's card              |
//! | `$e...$`   | an effect card                   |
//! | `$v...$`   | an attack name                   |
//! | `$g...$`   | good news (heads)                |
//! | `$b...$`   | bad news (tails, damage, lives)  |
//! | `{a\|b}`   | first form for the sender, second for everyone else |

mod chat;

pub use chat::{ChatContent, ChatMessage, Clock, ManualClock, SystemClock};

use std::borrow::Cow;
use std::collections::VecDeque;

use tracing::debug;

use crate::attacks::{AttackLogValues, AttackModel, AttackType};
use crate::cards::{CardCategory, HermitAttackType, Rarity};
use crate::components::{
    CardComponent, CoinFlip, CoinFlipRecord, PlayerComponent, RowComponent, SlotComponent,
    SlotKind, StatusEffectComponent,
};
use crate::core::{EntityId, GameState};

/// A queued, not yet flushed log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleLogEntry {
    pub player: EntityId,
    pub description: String,
}

/// Pending log entries.
#[derive(Clone, Debug, Default)]
pub struct BattleLog {
    queue: VecDeque<BattleLogEntry>,
}

impl BattleLog {
    pub fn push_front(&mut self, player: EntityId, description: String) {
        self.queue.push_front(BattleLogEntry { player, description });
    }

    pub fn push_back(&mut self, player: EntityId, description: String) {
        self.queue.push_back(BattleLogEntry { player, description });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleLogEntry> {
        self.queue.iter()
    }

    fn pop(&mut self) -> Option<BattleLogEntry> {
        self.queue.pop_front()
    }
}

/// Describes one card position in a play-card log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogPosition {
    pub row_index: Option<u8>,
    /// Card in the slot, e.g. `Iron Armor` or `Xisumavoid (2)`.
    pub name: String,
    /// Hermit of the slot's row.
    pub hermit_card: String,
    pub slot: SlotKind,
}

/// Pre-formatted pieces handed to a card's play-card log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayLogValues {
    pub player: String,
    pub coin_flip: String,
    /// `$p{You|name}$ used $eCard$ `
    pub header: String,
    pub pos: LogPosition,
    /// The slot picked for the card, if it asked for one.
    pub pick: Option<LogPosition>,
}

/// `flipped $gheads$`, `flipped $g2 heads$ and $b1 tails$`, ...
#[must_use]
pub fn coin_flip_description(tosses: &[CoinFlip]) -> String {
    let heads = tosses.iter().filter(|t| t.is_heads()).count();
    let tails = tosses.len() - heads;
    if tosses.len() == 1 {
        if heads > tails {
            "flipped $gheads$".to_string()
        } else {
            "flipped $btails$".to_string()
        }
    } else if tails == 0 {
        "flipped $gall heads$".to_string()
    } else if heads == 0 {
        "flipped $ball tails$".to_string()
    } else {
        format!("flipped $g{heads} heads$ and $b{tails} tails$")
    }
}

fn lives_text(lives: u8) -> Cow<'static, str> {
    match lives {
        0 => "no lives".into(),
        1 => "one life".into(),
        2 => "two lives".into(),
        3 => "three lives".into(),
        n => format!("{n} lives").into(),
    }
}

impl GameState {
    // === Names ===

    /// Display name of a card, with the row for non-active hermits and
    /// the energy count for items.
    #[must_use]
    pub fn log_card_name(&self, card: EntityId) -> String {
        let Some(c) = self.components.get::<CardComponent>(card) else {
            return String::new();
        };
        let props = c.props();
        match props.category() {
            CardCategory::Item if props.rarity == Rarity::Rare => format!("{} item x2", props.name),
            CardCategory::Item => format!("{} item", props.name),
            CardCategory::Hermit => match self.row_of_card(card) {
                Some(row) if Some(row) != self.active_row_of(c.player) => {
                    let index = self.components.get::<RowComponent>(row).map_or(0, |r| r.index);
                    format!("{} ({index})", props.name)
                }
                _ => props.name.to_string(),
            },
            _ => props.name.to_string(),
        }
    }

    fn log_position(&self, slot: EntityId) -> Option<LogPosition> {
        let s = self.components.get::<SlotComponent>(slot)?;
        let row = s.row.and_then(|r| self.components.get::<RowComponent>(r));
        let hermit = row.and_then(|r| self.card_in_slot(r.hermit_slot));
        Some(LogPosition {
            row_index: row.map(|r| r.index),
            name: self.card_in_slot(slot).map(|c| self.log_card_name(c)).unwrap_or_default(),
            hermit_card: hermit.map(|c| self.log_card_name(c)).unwrap_or_default(),
            slot: s.kind,
        })
    }

    fn effect_header(&self, card: Option<EntityId>) -> String {
        let Some(c) = card.and_then(|c| self.components.get::<CardComponent>(c)) else {
            return String::new();
        };
        let player = self.player_name(c.player);
        format!("$p{{You|{player}}}$ used $e{}$ ", c.props().name)
    }

    /// Description of the coin flip relevant to an attack of this type.
    fn attack_coin_flip(&self, player: EntityId, attack_type: AttackType) -> String {
        let Some(p) = self.components.get::<PlayerComponent>(player) else {
            return String::new();
        };
        let mut out = String::new();
        for flip in &p.coin_flips {
            if flip.opponent_flip {
                continue;
            }
            let category = self.components.get::<CardComponent>(flip.card).map(|c| c.category());
            let is_effect = attack_type == AttackType::Effect;
            if category == Some(CardCategory::Hermit) && is_effect {
                continue;
            }
            if category == Some(CardCategory::SingleUse) && !is_effect {
                continue;
            }
            out = coin_flip_description(&flip.tosses);
        }
        out
    }

    // === Entries ===

    /// Log a card being played, using the card's own log line.
    pub fn add_play_card_entry(&mut self, card: EntityId, pick: Option<EntityId>) {
        let Some(c) = self.components.get::<CardComponent>(card).cloned() else {
            return;
        };
        let Some(pos) = self.log_position(c.slot) else {
            return;
        };
        let coin_flip = self
            .components
            .get::<PlayerComponent>(c.player)
            .and_then(|p| p.coin_flips.iter().rev().find(|f| f.card == card))
            .map(|f| coin_flip_description(&f.tosses))
            .unwrap_or_default();
        let values = PlayLogValues {
            player: self.player_name(c.player),
            coin_flip,
            header: self.effect_header(Some(card)),
            pos,
            pick: pick.and_then(|slot| self.log_position(slot)),
        };
        if let Some(line) = c.card.log(&values) {
            self.battle_log.push_front(c.player, line);
        }
        self.send_logs();
    }

    /// Log a resolved attack and its sub-attacks.
    ///
    /// Sub-attacks of a different type get their own entry.
    pub fn add_attack_entry(&mut self, attack: &AttackModel, single_use: Option<EntityId>) {
        let Some(player) = self.attacker_player(attack) else {
            return;
        };

        let mut line = String::new();
        let subs = std::iter::once(attack).chain(attack.next_attacks.iter());
        for sub in subs {
            if sub.attack_type != attack.attack_type {
                self.add_attack_entry(sub, single_use);
                continue;
            }
            let Some(log) = sub.log.as_ref() else {
                continue;
            };
            if sub.damage() == 0 {
                continue;
            }
            let Some(values) = self.attack_log_values(sub, attack, player, single_use) else {
                continue;
            };
            line.push_str(&log(&values));
        }

        if line.is_empty() {
            return;
        }
        if self.config.debug.log_attack_history {
            for h in attack.history() {
                let source = h.source.map_or_else(|| "game".to_string(), |s| s.to_string());
                line.push_str(&format!("\n\t{source} → {:?}", h.change));
            }
        }
        debug!(%player, "attack entry queued");
        self.battle_log.push_front(player, line);
    }

    fn attack_log_values(
        &self,
        sub: &AttackModel,
        parent: &AttackModel,
        player: EntityId,
        single_use: Option<EntityId>,
    ) -> Option<AttackLogValues> {
        let target_row = self.components.get::<RowComponent>(sub.target()?)?;
        let target_hermit = self.hermit_in_row(target_row.entity)?;
        let target_name = self.components.get::<CardComponent>(target_hermit)?.props().name;
        let row_text = if self.active_row_of(target_row.player) == Some(target_row.entity) {
            String::new()
        } else {
            format!(" ({})", target_row.index)
        };
        let side = if target_row.player == player { 'p' } else { 'o' };

        let hermit = self
            .attacking_hermit(sub)
            .and_then(|h| self.components.get::<CardComponent>(h))
            .and_then(|c| c.props().hermit().map(|h| (c.props().name, h)));
        let (attacker, attack_name) = match hermit {
            Some((name, props)) => {
                let kind = if sub.attack_type == AttackType::Primary {
                    HermitAttackType::Primary
                } else {
                    HermitAttackType::Secondary
                };
                (name.to_string(), props.attack(kind).name.to_string())
            }
            None => {
                let name = sub
                    .attacker()
                    .and_then(|a| self.components.get::<StatusEffectComponent>(a))
                    .map(|e| e.props().name.to_string())
                    .unwrap_or_default();
                (name, String::new())
            }
        };

        Some(AttackLogValues {
            attacker: format!("$p{attacker}$"),
            target: format!("${side}{target_name}{row_text}$"),
            attack_name: format!("$v{attack_name}$"),
            damage: format!("$b{}hp$", sub.calculate_damage()),
            player: self.player_name(player),
            opponent: self.player_name(target_row.player),
            coin_flip: self.attack_coin_flip(player, parent.attack_type),
            header: self.effect_header(single_use),
        })
    }

    /// Log coin flips made on the current player's behalf by opponent cards.
    pub fn add_opponent_coin_flip_entry(&mut self, flips: &[CoinFlipRecord]) {
        let Some(player) = self.current_player_entity() else {
            return;
        };
        for flip in flips.iter().filter(|f| f.opponent_flip) {
            let name = self
                .components
                .get::<CardComponent>(flip.card)
                .map_or("", |c| c.props().name);
            let line = format!("$o{name}$ {} on their coinflip", coin_flip_description(&flip.tosses));
            self.battle_log.push_back(player, line);
        }
    }

    pub fn add_custom_entry(&mut self, player: EntityId, entry: impl Into<String>) {
        self.battle_log.push_back(player, entry.into());
    }

    /// Log a knockout. Call after the life has been taken.
    pub fn add_death_entry(&mut self, player: EntityId, hermit: EntityId) {
        let name = self
            .components
            .get::<CardComponent>(hermit)
            .map_or("", |c| c.props().name);
        let lives = self.components.get::<PlayerComponent>(player).map_or(0, |p| p.lives);
        let line = format!(
            "$p{name}$ was knocked out, and $p{{you|{}}}$ now {{have|has}} $b{}$ remaining",
            self.player_name(player),
            lives_text(lives)
        );
        self.battle_log.push_back(player, line);
        self.send_logs();
    }

    /// Append the turn separator straight to the chat.
    pub fn add_turn_end_entry(&mut self) {
        let Some(sender) = self.opponent_player_entity() else {
            return;
        };
        self.chat.push_back(ChatMessage {
            created_at: self.clock.now_millis(),
            message: ChatContent::Line,
            sender,
            system_message: true,
        });
    }

    /// Flush every queued entry into the chat, front first.
    pub fn send_logs(&mut self) {
        while let Some(entry) = self.battle_log.pop() {
            self.chat.push_back(ChatMessage {
                created_at: self.clock.now_millis(),
                message: ChatContent::Text(entry.description),
                sender: entry.player,
                system_message: true,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::test_support::two_player_game;

    #[test]
    fn test_coin_flip_descriptions() {
        use CoinFlip::{Heads, Tails};
        assert_eq!(coin_flip_description(&[Heads]), "flipped $gheads$");
        assert_eq!(coin_flip_description(&[Tails]), "flipped $btails$");
        assert_eq!(coin_flip_description(&[Heads, Heads]), "flipped $gall heads$");
        assert_eq!(coin_flip_description(&[Tails, Tails, Tails]), "flipped $ball tails$");
        assert_eq!(
            coin_flip_description(&[Heads, Tails, Heads]),
            "flipped $g2 heads$ and $b1 tails$"
        );
    }

    #[test]
    fn test_lives_text() {
        assert_eq!(lives_text(0), "no lives");
        assert_eq!(lives_text(1), "one life");
        assert_eq!(lives_text(3), "three lives");
        assert_eq!(lives_text(5), "5 lives");
    }

    #[test]
    fn test_death_entry_with_extra_lives() {
        let mut game = two_player_game();
        let bob = game.player_entity(PlayerId::SECOND);
        let hermit = game.player(bob).unwrap().hand[0];
        game.player_mut(bob).unwrap().lives = 4;
        game.add_death_entry(bob, hermit);
        assert!(game.chat.iter().any(|m| m.text().is_some_and(|t| t.contains("$b4 lives$"))));
    }

    #[test]
    fn test_front_and_back_ordering() {
        let mut log = BattleLog::default();
        log.push_back(EntityId(1), "b".into());
        log.push_front(EntityId(1), "a".into());
        log.push_back(EntityId(1), "c".into());
        let lines: Vec<_> = log.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_send_logs_drains_queue() {
        let mut game = two_player_game();
        let p = game.player_entity(PlayerId::FIRST);
        let before = game.chat.len();
        game.add_custom_entry(p, "one");
        game.add_custom_entry(p, "two");
        game.send_logs();

        assert!(game.battle_log.is_empty());
        let texts: Vec<_> = game.chat.iter().skip(before).filter_map(|m| m.text()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert!(game.chat.iter().all(|m| m.system_message));
    }

    #[test]
    fn test_turn_end_entry_is_a_line() {
        let mut game = two_player_game();
        game.add_turn_end_entry();
        assert_eq!(game.chat.last().map(|m| &m.message), Some(&ChatContent::Line));
    }
}
