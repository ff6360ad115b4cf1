//! Item energy and attack costs.

use smallvec::SmallVec;

use crate::cards::{EnergyType, HermitAttackType};
use crate::components::{CardComponent, RowComponent};
use crate::core::{EntityId, GameState};
use crate::hooks::hook;

/// Whether `energy` pays for `cost`.
///
/// Typed costs take a matching energy first and fall back to an `Any`
/// energy; whatever is left must cover the `Any` costs.
#[must_use]
pub fn has_enough_energy(energy: &[EnergyType], cost: &[EnergyType]) -> bool {
    let mut remaining: SmallVec<[EnergyType; 8]> = energy.iter().copied().collect();
    let mut any_cost = 0;
    for &need in cost {
        if need == EnergyType::Any {
            any_cost += 1;
            continue;
        }
        let found = remaining
            .iter()
            .position(|&e| e == need)
            .or_else(|| remaining.iter().position(|&e| e == EnergyType::Any));
        match found {
            Some(index) => {
                remaining.swap_remove(index);
            }
            None => return false,
        }
    }
    remaining.len() >= any_cost
}

impl GameState {
    /// Energy the items in `row` provide, before hooks.
    #[must_use]
    pub fn row_energy(&self, row: EntityId) -> Vec<EnergyType> {
        let Some(r) = self.components.get::<RowComponent>(row) else {
            return Vec::new();
        };
        r.item_slots
            .iter()
            .filter_map(|&slot| self.card_in_slot(slot))
            .filter_map(|card| self.components.get::<CardComponent>(card))
            .filter_map(|c| c.props().item().copied())
            .flat_map(|item| std::iter::repeat(EnergyType::Typed(item.energy)).take(usize::from(item.count)))
            .collect()
    }

    /// Energy available to `player`'s active hermit, after the
    /// `available_energy` hooks had their say.
    pub fn available_energy(&mut self, player: EntityId) -> Vec<EnergyType> {
        let mut energy = self.active_row_of(player).map(|row| self.row_energy(row)).unwrap_or_default();
        self.call_hook(player, hook::available_energy, &mut energy);
        energy
    }

    /// Whether `player`'s active hermit can pay for an attack.
    pub fn can_afford_attack(&mut self, player: EntityId, kind: HermitAttackType) -> bool {
        let Some(cost) = self
            .active_hermit(player)
            .and_then(|h| self.components.get::<CardComponent>(h))
            .and_then(|c| c.props().hermit().map(|h| h.attack(kind).cost))
        else {
            return false;
        };
        if self.config.debug.no_item_requirements {
            return true;
        }
        let energy = self.available_energy(player);
        has_enough_energy(&energy, cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::HermitType::{Builder, Miner, Redstone};

    const R: EnergyType = EnergyType::Typed(Redstone);
    const B: EnergyType = EnergyType::Typed(Builder);
    const M: EnergyType = EnergyType::Typed(Miner);
    const ANY: EnergyType = EnergyType::Any;

    #[test]
    fn test_typed_then_any() {
        assert!(has_enough_energy(&[R, B], &[R, ANY]));
        assert!(has_enough_energy(&[R, R], &[R, R]));
        assert!(!has_enough_energy(&[R], &[R, ANY]));
        assert!(!has_enough_energy(&[B, B], &[R]));
    }

    #[test]
    fn test_any_energy_is_a_wildcard() {
        assert!(has_enough_energy(&[ANY], &[M]));
        assert!(has_enough_energy(&[M, ANY], &[M, ANY]));
        assert!(!has_enough_energy(&[ANY], &[M, ANY]));
    }

    #[test]
    fn test_empty_cost_is_free() {
        assert!(has_enough_energy(&[], &[]));
    }
}
