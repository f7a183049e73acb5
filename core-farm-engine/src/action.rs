// =====================================================================================
// File: core-farm-engine/src/action.rs
// Description: Closed action variant type and per-action state transitions (C4)
// =====================================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{catalog, ItemCategory};
use crate::error::{EngineError, EngineResult};
use crate::state::{FarmState, FieldState, TreeState};

/// The closed set of action kinds a batch may contain. Serde's externally
/// tagged representation on `kind` mirrors the wire shape in spec section 3;
/// an unrecognized tag is a decoding error, never a runtime branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum Action {
    #[serde(rename = "item.planted")]
    ItemPlanted {
        #[serde(rename = "createdAt")]
        created_at: DateTime<Utc>,
        index: u32,
        item: String,
    },
    #[serde(rename = "item.harvested")]
    ItemHarvested {
        #[serde(rename = "createdAt")]
        created_at: DateTime<Utc>,
        index: u32,
    },
    #[serde(rename = "tree.chopped")]
    TreeChopped {
        #[serde(rename = "createdAt")]
        created_at: DateTime<Utc>,
        index: u32,
        item: String,
    },
    #[serde(rename = "item.crafted")]
    ItemCrafted {
        #[serde(rename = "createdAt")]
        created_at: DateTime<Utc>,
        item: String,
        amount: Decimal,
    },
    #[serde(rename = "item.sell")]
    ItemSell {
        #[serde(rename = "createdAt")]
        created_at: DateTime<Utc>,
        item: String,
        amount: Decimal,
    },
    #[serde(rename = "item.redeemed")]
    ItemRedeemed {
        #[serde(rename = "createdAt")]
        created_at: DateTime<Utc>,
        item: String,
    },
}

impl Action {
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Action::ItemPlanted { created_at, .. }
            | Action::ItemHarvested { created_at, .. }
            | Action::TreeChopped { created_at, .. }
            | Action::ItemCrafted { created_at, .. }
            | Action::ItemSell { created_at, .. }
            | Action::ItemRedeemed { created_at, .. } => *created_at,
        }
    }
}

/// Apply a single action to a working copy of `state`, returning the new
/// state. Never partially updates: on error the caller's original `state`
/// (owned by them, untouched) remains the source of truth.
///
/// `now` is carried in the signature to match the transition shape in the
/// dispatch contract, even though every current transition reasons from
/// `action.created_at()` rather than wall-clock time directly — wall-clock
/// plausibility is already the temporal gate's job (C3), not the
/// dispatcher's.
pub fn dispatch(state: &FarmState, action: &Action, _now: DateTime<Utc>) -> EngineResult<FarmState> {
    let mut next = state.clone();
    match action {
        Action::ItemPlanted { created_at, index, item } => plant(&mut next, *index, item, *created_at)?,
        Action::ItemHarvested { created_at, index } => harvest(&mut next, *index, *created_at)?,
        Action::TreeChopped { created_at, index, item } => chop(&mut next, *index, item, *created_at)?,
        Action::ItemCrafted { item, amount, .. } => craft(&mut next, item, *amount)?,
        Action::ItemSell { item, amount, .. } => sell(&mut next, item, *amount)?,
        Action::ItemRedeemed { item, .. } => redeem(&mut next, item)?,
    }
    Ok(next)
}

fn plant(state: &mut FarmState, index: u32, item: &str, created_at: DateTime<Utc>) -> EngineResult<()> {
    if index >= crate::catalog::FIELD_COUNT {
        return Err(EngineError::InvalidIndex { index });
    }
    let cat = catalog();
    if cat.try_crop(item).is_none() {
        return Err(EngineError::UnknownItem { item: item.to_string() });
    }
    if state.fields.contains_key(&index) {
        return Err(EngineError::FieldOccupied { index });
    }
    state.sub_inventory(item, Decimal::ONE)?;
    state.fields.insert(
        index,
        FieldState {
            planted_at: created_at,
            item: item.to_string(),
        },
    );
    Ok(())
}

fn harvest(state: &mut FarmState, index: u32, created_at: DateTime<Utc>) -> EngineResult<()> {
    let field = state
        .fields
        .get(&index)
        .ok_or(EngineError::FieldEmpty { index })?
        .clone();
    let cat = catalog();
    let crop = cat.crop(&field.item);
    let grown_at = field.planted_at + chrono::Duration::seconds(crop.grow_seconds);
    if created_at < grown_at {
        return Err(EngineError::NotGrown { index });
    }
    state.fields.remove(&index);
    state.add_inventory(crop.harvests_into, Decimal::ONE);
    Ok(())
}

fn chop(state: &mut FarmState, index: u32, item: &str, created_at: DateTime<Utc>) -> EngineResult<()> {
    if item != "Axe" {
        return Err(EngineError::UnknownItem { item: item.to_string() });
    }
    if index >= crate::catalog::TREE_COUNT {
        return Err(EngineError::InvalidIndex { index });
    }
    state.sub_inventory("Axe", Decimal::ONE)?;

    let template = catalog().tree_template();
    let tree = state.trees.entry(index).or_insert(TreeState {
        chopped_at: created_at,
        wood: template.wood_yield,
    });

    if tree.wood.is_zero() {
        let recovered_at = tree.chopped_at + chrono::Duration::seconds(template.recovery_seconds);
        if created_at < recovered_at {
            return Err(EngineError::TreeNotRecovered { index });
        }
        tree.wood = template.wood_yield;
    }

    tree.wood -= Decimal::ONE;
    if tree.wood.is_zero() {
        tree.chopped_at = created_at;
    }
    state.add_inventory("Wood", Decimal::ONE);
    Ok(())
}

fn craft(state: &mut FarmState, item: &str, amount: Decimal) -> EngineResult<()> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::InsufficientInventory {
            item: item.to_string(),
            required: amount.to_string(),
            available: state.inventory_of(item).to_string(),
        });
    }
    let cat = catalog();
    let recipe = cat
        .recipe(item)
        .ok_or_else(|| EngineError::UnknownItem { item: item.to_string() })?;
    if !recipe.craftable {
        return Err(EngineError::NotCraftable { item: item.to_string() });
    }

    for (ingredient, cost) in recipe.ingredients {
        state.sub_inventory(ingredient, *cost * amount)?;
    }
    state.sub_balance(recipe.sfl_price * amount)?;
    if recipe.from_stock {
        state.sub_stock(item, amount)?;
    }
    state.add_inventory(item, amount);
    Ok(())
}

fn sell(state: &mut FarmState, item: &str, amount: Decimal) -> EngineResult<()> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::InsufficientInventory {
            item: item.to_string(),
            required: amount.to_string(),
            available: state.inventory_of(item).to_string(),
        });
    }
    let cat = catalog();
    if !cat.is_sellable(item) {
        return Err(EngineError::NotSellable { item: item.to_string() });
    }
    let price = cat.sell_price(item).expect("is_sellable implies a price row");
    state.sub_inventory(item, amount)?;
    state.add_balance(price * amount);
    Ok(())
}

fn redeem(state: &mut FarmState, item: &str) -> EngineResult<()> {
    let cat = catalog();
    let redeemable = cat
        .redeemable(item)
        .ok_or_else(|| EngineError::NotRedeemable { item: item.to_string() })?;
    // Limited redeemables are minted by an external airdrop path, never here
    // (invariant 6); the save pipeline only ever grants non-limited promos.
    if redeemable.limited {
        return Err(EngineError::NotRedeemable { item: item.to_string() });
    }
    state.add_inventory(item, Decimal::ONE);
    Ok(())
}

/// Ensures no action in `state_after` introduced a `limited`-category item
/// that was not already present in `state_before` (invariant P5 / 6).
pub fn assert_no_new_limited_items(state_before: &FarmState, state_after: &FarmState) -> EngineResult<()> {
    let cat = catalog();
    for (item, qty) in &state_after.inventory {
        if let Some(def) = cat.try_item(item) {
            if def.category == ItemCategory::Limited {
                let before = state_before.inventory_of(item);
                if *qty > before {
                    return Err(EngineError::NotWithdrawable { item: item.clone() });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn harvest_flow() {
        let mut farm = FarmState::new("0xabc");
        farm.add_inventory("Sunflower Seed", Decimal::ONE);
        let t0 = now() - chrono::Duration::seconds(60);
        let t1 = now();

        let planted = Action::ItemPlanted {
            created_at: t0,
            index: 4,
            item: "Sunflower Seed".to_string(),
        };
        farm = dispatch(&farm, &planted, t0).unwrap();
        assert!(!farm.inventory.contains_key("Sunflower Seed"));
        assert!(farm.fields.contains_key(&4));

        let harvested = Action::ItemHarvested { created_at: t1, index: 4 };
        farm = dispatch(&farm, &harvested, t1).unwrap();
        assert_eq!(farm.inventory_of("Sunflower"), Decimal::ONE);
        assert!(!farm.fields.contains_key(&4));
    }

    #[test]
    fn harvest_before_grown_is_rejected() {
        let mut farm = FarmState::new("0xabc");
        farm.add_inventory("Sunflower Seed", Decimal::ONE);
        let t0 = now();
        let planted = Action::ItemPlanted {
            created_at: t0,
            index: 0,
            item: "Sunflower Seed".to_string(),
        };
        farm = dispatch(&farm, &planted, t0).unwrap();

        let harvested = Action::ItemHarvested {
            created_at: t0 + chrono::Duration::seconds(1),
            index: 0,
        };
        let err = dispatch(&farm, &harvested, t0).unwrap_err();
        assert!(matches!(err, EngineError::NotGrown { .. }));
    }

    #[test]
    fn craft_limited_item_is_refused() {
        let mut farm = FarmState::new("0xabc");
        farm.balance = dec!(100);
        let crafted = Action::ItemCrafted {
            created_at: now(),
            item: "Chicken Coop".to_string(),
            amount: dec!(1),
        };
        let err = dispatch(&farm, &crafted, now()).unwrap_err();
        assert_eq!(err, EngineError::NotCraftable { item: "Chicken Coop".to_string() });
        assert_eq!(farm.balance, dec!(100));
    }

    #[test]
    fn craft_from_stock_draws_down_stock_and_balance() {
        let mut farm = FarmState::new("0xabc");
        farm.balance = dec!(20);
        farm.stock.insert("Potato Seed".to_string(), dec!(7));

        let crafted = Action::ItemCrafted {
            created_at: now(),
            item: "Potato Seed".to_string(),
            amount: dec!(5),
        };
        let farm = dispatch(&farm, &crafted, now()).unwrap();
        assert_eq!(farm.balance, dec!(19.9));
        assert_eq!(farm.stock_of("Potato Seed"), dec!(2));
        assert_eq!(farm.inventory_of("Potato Seed"), dec!(5));
    }

    #[test]
    fn craft_rejects_non_positive_amount() {
        let mut farm = FarmState::new("0xabc");
        farm.balance = dec!(20);
        farm.stock.insert("Potato Seed".to_string(), dec!(7));

        let crafted = Action::ItemCrafted {
            created_at: now(),
            item: "Potato Seed".to_string(),
            amount: dec!(-5),
        };
        let err = dispatch(&farm, &crafted, now()).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientInventory { .. }));
        // Negative amount must never pay out balance or stock.
        assert_eq!(farm.balance, dec!(20));
        assert_eq!(farm.stock_of("Potato Seed"), dec!(7));
    }

    #[test]
    fn sell_is_blocked_for_tools_and_limited_items() {
        let mut farm = FarmState::new("0xabc");
        farm.add_inventory("Axe", Decimal::ONE);
        let sell_axe = Action::ItemSell {
            created_at: now(),
            item: "Axe".to_string(),
            amount: Decimal::ONE,
        };
        let err = dispatch(&farm, &sell_axe, now()).unwrap_err();
        assert_eq!(err, EngineError::NotSellable { item: "Axe".to_string() });
    }

    #[test]
    fn tree_chop_recovers_after_window() {
        let mut farm = FarmState::new("0xabc");
        farm.add_inventory("Axe", Decimal::ONE);
        let recovery = catalog().tree_template().recovery_seconds;
        let chopped_at = now() - chrono::Duration::seconds(recovery + 60);
        farm.trees.insert(
            0,
            TreeState {
                chopped_at,
                wood: Decimal::ZERO,
            },
        );

        let chop_action = Action::TreeChopped {
            created_at: now(),
            index: 0,
            item: "Axe".to_string(),
        };
        let farm = dispatch(&farm, &chop_action, now()).unwrap();
        assert_eq!(farm.inventory_of("Wood"), Decimal::ONE);
        assert!(!farm.inventory.contains_key("Axe"));
        assert_eq!(farm.trees.get(&0).unwrap().wood, dec!(2));
    }

    #[test]
    fn tree_chop_before_recovery_is_rejected() {
        let mut farm = FarmState::new("0xabc");
        farm.add_inventory("Axe", Decimal::ONE);
        farm.trees.insert(
            0,
            TreeState {
                chopped_at: now() - chrono::Duration::minutes(30),
                wood: Decimal::ZERO,
            },
        );
        let chop_action = Action::TreeChopped {
            created_at: now(),
            index: 0,
            item: "Axe".to_string(),
        };
        let err = dispatch(&farm, &chop_action, now()).unwrap_err();
        assert!(matches!(err, EngineError::TreeNotRecovered { .. }));
    }

    #[test]
    fn no_new_limited_items_invariant_holds() {
        let before = FarmState::new("0xabc");
        let mut after = before.clone();
        after.add_inventory("Chicken Coop", Decimal::ONE);
        let err = assert_no_new_limited_items(&before, &after).unwrap_err();
        assert!(matches!(err, EngineError::NotWithdrawable { .. }));
    }
}
