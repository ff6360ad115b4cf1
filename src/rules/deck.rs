//! Deck-building rules.
//!
//! Checks run simplest problem first so a player sees the easiest fix:
//! disabled expansions, hermit count, duplicates, ultra rares, rares, and
//! finally the deck size.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::cards::{Card, CardCategory, Rarity};
use crate::core::DeckLimits;
use crate::error::DeckError;

/// Check a resolved deck against `limits`.
pub fn validate_deck(cards: &[Arc<dyn Card>], limits: &DeckLimits) -> Result<(), DeckError> {
    if let Some(card) = cards
        .iter()
        .map(|c| c.props())
        .find(|p| limits.disabled_expansions.iter().any(|e| e == p.expansion))
    {
        return Err(DeckError::DisabledExpansion {
            card: card.id.to_string(),
            expansion: card.expansion.to_string(),
        });
    }

    let hermits = count(cards, |c| c.props().category() == CardCategory::Hermit);
    if hermits < limits.min_hermits {
        return Err(DeckError::TooFewHermits {
            min: limits.min_hermits,
            found: hermits,
        });
    }
    if let Some(max) = limits.max_hermits.filter(|&max| hermits > max) {
        return Err(DeckError::TooManyHermits { max, found: hermits });
    }

    if let Some(max) = limits.max_duplicates {
        let mut copies: FxHashMap<&str, usize> = FxHashMap::default();
        for props in cards.iter().map(|c| c.props()) {
            if props.category() == CardCategory::Item {
                continue;
            }
            let n = copies.entry(props.id).or_insert(0);
            *n += 1;
            if *n > max {
                return Err(DeckError::TooManyDuplicates {
                    card: props.id.to_string(),
                    max,
                });
            }
        }
    }

    if count(cards, |c| c.props().rarity == Rarity::UltraRare) > limits.max_ultra_rares {
        return Err(DeckError::TooManyUltraRares {
            max: limits.max_ultra_rares,
        });
    }
    if count(cards, |c| c.props().rarity == Rarity::Rare) > limits.max_rares {
        return Err(DeckError::TooManyRares { max: limits.max_rares });
    }

    let found = cards.len();
    let exact = limits.min_cards == limits.max_cards;
    if found < limits.min_cards || found > limits.max_cards {
        return Err(if exact {
            DeckError::WrongSize {
                expected: limits.min_cards,
                found,
            }
        } else if found < limits.min_cards {
            DeckError::TooFewCards {
                min: limits.min_cards,
                found,
            }
        } else {
            DeckError::TooManyCards {
                max: limits.max_cards,
                found,
            }
        });
    }
    Ok(())
}

fn count(cards: &[Arc<dyn Card>], pred: impl Fn(&Arc<dyn Card>) -> bool) -> usize {
    cards.iter().filter(|c| pred(c)).count()
}
