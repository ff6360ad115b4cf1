use crate::cards::{CardKind, CardProps, HermitType, ItemProps, Rarity};

const TYPES: [(HermitType, &str, &str); 10] = [
    (HermitType::Balanced, "balanced", "Balanced"),
    (HermitType::Builder, "builder", "Builder"),
    (HermitType::Explorer, "explorer", "Explorer"),
    (HermitType::Farm, "farm", "Farm"),
    (HermitType::Miner, "miner", "Miner"),
    (HermitType::Prankster, "prankster", "Prankster"),
    (HermitType::Pvp, "pvp", "PvP"),
    (HermitType::Redstone, "redstone", "Redstone"),
    (HermitType::Speedrunner, "speedrunner", "Speedrunner"),
    (HermitType::Terraform, "terraform", "Terraform"),
];

const COMMON_IDS: [&str; 10] = [
    "balanced_item_common",
    "builder_item_common",
    "explorer_item_common",
    "farm_item_common",
    "miner_item_common",
    "prankster_item_common",
    "pvp_item_common",
    "redstone_item_common",
    "speedrunner_item_common",
    "terraform_item_common",
];

const RARE_IDS: [&str; 10] = [
    "balanced_item_rare",
    "builder_item_rare",
    "explorer_item_rare",
    "farm_item_rare",
    "miner_item_rare",
    "prankster_item_rare",
    "pvp_item_rare",
    "redstone_item_rare",
    "speedrunner_item_rare",
    "terraform_item_rare",
];

/// Common (one energy) and rare (two energy) items of every type.
#[must_use]
pub fn item_props() -> Vec<CardProps> {
    let mut out = Vec::with_capacity(TYPES.len() * 2);
    for (i, (energy, _, name)) in TYPES.into_iter().enumerate() {
        let base = 200 + 2 * i as u16;
        out.push(CardProps {
            id: COMMON_IDS[i],
            numeric_id: base,
            name,
            expansion: "default",
            rarity: Rarity::Common,
            tokens: 0,
            description: "",
            kind: CardKind::Item(ItemProps { energy, count: 1 }),
        });
        out.push(CardProps {
            id: RARE_IDS[i],
            numeric_id: base + 1,
            name,
            expansion: "default",
            rarity: Rarity::Rare,
            tokens: 2,
            description: "Counts as 2 items.",
            kind: CardKind::Item(ItemProps { energy, count: 2 }),
        });
    }
    out
}
