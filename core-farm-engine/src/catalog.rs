// =====================================================================================
// File: core-farm-engine/src/catalog.rs
// Description: Static item, recipe and price tables (C1)
// =====================================================================================

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub type ItemName = String;

/// Category an item belongs to. Used to gate which action kinds may touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Seed,
    Crop,
    Tool,
    Resource,
    Limited,
    Currency,
}

/// One row of the item universe.
#[derive(Debug, Clone)]
pub struct ItemDef {
    pub name: &'static str,
    pub category: ItemCategory,
    /// Stable on-chain numeric id, used by the reconciler and withdrawal preparer.
    pub chain_id: u32,
    /// Whether this item may ever leave the farm via the signer pathway.
    pub withdrawable: bool,
}

/// Seed -> crop mapping with grow time.
#[derive(Debug, Clone, Copy)]
pub struct CropDef {
    pub seed: &'static str,
    pub harvests_into: &'static str,
    pub grow_seconds: i64,
}

/// Ingredient cost row for a craftable recipe or tool.
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub item: &'static str,
    pub ingredients: &'static [(&'static str, Decimal)],
    pub sfl_price: Decimal,
    pub craftable: bool,
    /// Whether crafting this item draws down the shop `stock` map.
    pub from_stock: bool,
}

/// Default tree template: yield per chop cycle and recovery window.
#[derive(Debug, Clone, Copy)]
pub struct TreeTemplate {
    pub wood_yield: Decimal,
    pub recovery_seconds: i64,
}

/// Promotional / redeemable item eligibility.
#[derive(Debug, Clone, Copy)]
pub struct RedeemableDef {
    pub item: &'static str,
    /// Whether the produced item counts against the "no new limited items" invariant.
    pub limited: bool,
}

/// The fixed field and tree counts this catalog's farm layout supports.
pub const FIELD_COUNT: u32 = 22;
pub const TREE_COUNT: u32 = 5;

pub struct Catalog {
    items: BTreeMap<&'static str, ItemDef>,
    crops: BTreeMap<&'static str, CropDef>,
    recipes: BTreeMap<&'static str, RecipeDef>,
    sell_prices: BTreeMap<&'static str, Decimal>,
    non_sellable: BTreeMap<&'static str, ()>,
    redeemables: BTreeMap<&'static str, RedeemableDef>,
    tree_template: TreeTemplate,
    /// withdrawal tax brackets: (sfl upper bound exclusive, basis points). Sorted ascending.
    /// The last entry's bound is ignored and used as the floor bracket.
    tax_brackets: &'static [(Decimal, u32)],
    chain_id_to_name: BTreeMap<u32, &'static str>,
}

impl Catalog {
    pub fn item(&self, name: &str) -> &ItemDef {
        self.items
            .get(name)
            .unwrap_or_else(|| panic!("unknown item in catalog lookup: {name}"))
    }

    pub fn try_item(&self, name: &str) -> Option<&ItemDef> {
        self.items.get(name)
    }

    pub fn crop(&self, seed: &str) -> &CropDef {
        self.crops
            .get(seed)
            .unwrap_or_else(|| panic!("unknown seed in catalog lookup: {seed}"))
    }

    pub fn try_crop(&self, seed: &str) -> Option<&CropDef> {
        self.crops.get(seed)
    }

    pub fn recipe(&self, item: &str) -> Option<&RecipeDef> {
        self.recipes.get(item)
    }

    pub fn sell_price(&self, item: &str) -> Option<Decimal> {
        self.sell_prices.get(item).copied()
    }

    pub fn is_sellable(&self, item: &str) -> bool {
        self.sell_prices.contains_key(item) && !self.non_sellable.contains_key(item)
    }

    pub fn redeemable(&self, item: &str) -> Option<&RedeemableDef> {
        self.redeemables.get(item)
    }

    pub fn tree_template(&self) -> TreeTemplate {
        self.tree_template
    }

    pub fn is_withdrawable(&self, chain_id: u32) -> bool {
        self.chain_id_to_name
            .get(&chain_id)
            .map(|name| self.item(name).withdrawable)
            .unwrap_or(false)
    }

    pub fn name_for_chain_id(&self, chain_id: u32) -> Option<&'static str> {
        self.chain_id_to_name.get(&chain_id).copied()
    }

    /// Per-item on-chain decimal precision: currency-like items use 18
    /// decimals, everything else is a 1-to-1 whole-unit on-chain count.
    pub fn onchain_decimals(&self, name: &str) -> u32 {
        match self.item(name).category {
            ItemCategory::Currency => 18,
            _ => 0,
        }
    }

    /// Piecewise withdrawal tax, returned in basis points (1% = 100 bps).
    pub fn withdrawal_tax_bps(&self, sfl: Decimal) -> u32 {
        for (upper, bps) in self.tax_brackets {
            if sfl < *upper {
                return *bps;
            }
        }
        // floor bracket: last entry's bps value applies beyond all bounds.
        self.tax_brackets.last().map(|(_, bps)| *bps).unwrap_or(500)
    }
}

fn build_catalog() -> Catalog {
    let mut items = BTreeMap::new();
    let mut chain_id_to_name = BTreeMap::new();

    macro_rules! item {
        ($name:expr, $category:expr, $chain_id:expr, $withdrawable:expr) => {
            items.insert(
                $name,
                ItemDef {
                    name: $name,
                    category: $category,
                    chain_id: $chain_id,
                    withdrawable: $withdrawable,
                },
            );
            chain_id_to_name.insert($chain_id, $name);
        };
    }

    item!("Sunflower Seed", ItemCategory::Seed, 0, false);
    item!("Sunflower", ItemCategory::Crop, 1, false);
    item!("Potato Seed", ItemCategory::Seed, 2, false);
    item!("Potato", ItemCategory::Crop, 3, false);
    item!("Pumpkin Seed", ItemCategory::Seed, 4, false);
    item!("Pumpkin", ItemCategory::Crop, 5, false);
    item!("Wood", ItemCategory::Resource, 6, true);
    item!("Axe", ItemCategory::Tool, 7, true);
    item!("Chicken Coop", ItemCategory::Limited, 8, true);
    item!("Golden Egg", ItemCategory::Limited, 9, true);
    item!("SFL", ItemCategory::Currency, 100, false);

    let mut crops = BTreeMap::new();
    crops.insert(
        "Sunflower Seed",
        CropDef {
            seed: "Sunflower Seed",
            harvests_into: "Sunflower",
            grow_seconds: 60,
        },
    );
    crops.insert(
        "Potato Seed",
        CropDef {
            seed: "Potato Seed",
            harvests_into: "Potato",
            grow_seconds: 300,
        },
    );
    crops.insert(
        "Pumpkin Seed",
        CropDef {
            seed: "Pumpkin Seed",
            harvests_into: "Pumpkin",
            grow_seconds: 3600,
        },
    );

    let mut recipes = BTreeMap::new();
    recipes.insert(
        "Potato Seed",
        RecipeDef {
            item: "Potato Seed",
            ingredients: &[],
            sfl_price: dec!(0.02),
            craftable: true,
            from_stock: true,
        },
    );
    recipes.insert(
        "Sunflower Seed",
        RecipeDef {
            item: "Sunflower Seed",
            ingredients: &[],
            sfl_price: dec!(0.01),
            craftable: true,
            from_stock: true,
        },
    );
    recipes.insert(
        "Pumpkin Seed",
        RecipeDef {
            item: "Pumpkin Seed",
            ingredients: &[],
            sfl_price: dec!(0.05),
            craftable: true,
            from_stock: true,
        },
    );
    recipes.insert(
        "Axe",
        RecipeDef {
            item: "Axe",
            ingredients: &[],
            sfl_price: dec!(1),
            craftable: true,
            from_stock: false,
        },
    );
    // Limited items are never craftable via the save pipeline (invariant 6).
    recipes.insert(
        "Chicken Coop",
        RecipeDef {
            item: "Chicken Coop",
            ingredients: &[],
            sfl_price: dec!(0),
            craftable: false,
            from_stock: false,
        },
    );

    let mut sell_prices = BTreeMap::new();
    sell_prices.insert("Sunflower", dec!(0.02));
    sell_prices.insert("Potato", dec!(0.14));
    sell_prices.insert("Pumpkin", dec!(0.4));
    sell_prices.insert("Wood", dec!(0.2));

    // Tools and limited items are never sellable even though Wood/crops are.
    let mut non_sellable = BTreeMap::new();
    non_sellable.insert("Axe", ());
    non_sellable.insert("Chicken Coop", ());
    non_sellable.insert("Golden Egg", ());

    let mut redeemables = BTreeMap::new();
    redeemables.insert(
        "Golden Egg",
        RedeemableDef {
            item: "Golden Egg",
            limited: true,
        },
    );

    Catalog {
        items,
        crops,
        recipes,
        sell_prices,
        non_sellable,
        redeemables,
        tree_template: TreeTemplate {
            wood_yield: dec!(3),
            recovery_seconds: 120 * 60,
        },
        tax_brackets: &[
            (dec!(10), 3000),
            (dec!(100), 2500),
            (dec!(1000), 1000),
            (dec!(10000), 500),
        ],
        chain_id_to_name,
    }
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// The process-wide catalog instance. Built once on first access, immutable thereafter.
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(build_catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limited_items_are_never_craftable() {
        let cat = catalog();
        assert!(!cat.recipe("Chicken Coop").unwrap().craftable);
    }

    #[test]
    fn tools_and_limited_items_are_not_sellable() {
        let cat = catalog();
        assert!(!cat.is_sellable("Axe"));
        assert!(!cat.is_sellable("Chicken Coop"));
        assert!(cat.is_sellable("Sunflower"));
    }

    #[test]
    fn tax_brackets_are_piecewise_descending() {
        let cat = catalog();
        assert_eq!(cat.withdrawal_tax_bps(dec!(5)), 3000);
        assert_eq!(cat.withdrawal_tax_bps(dec!(50)), 2500);
        assert_eq!(cat.withdrawal_tax_bps(dec!(500)), 1000);
        assert_eq!(cat.withdrawal_tax_bps(dec!(50000)), 500);
    }

    #[test]
    fn chain_id_roundtrips_to_name() {
        let cat = catalog();
        assert_eq!(cat.name_for_chain_id(7), Some("Axe"));
        assert!(cat.is_withdrawable(7));
        assert!(!cat.is_withdrawable(1));
    }
}
