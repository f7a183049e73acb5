// =====================================================================================
// File: core-farm-engine/src/state.rs
// Description: In-memory farm aggregate and decimal arithmetic helpers (C2)
// =====================================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::ItemName;
use crate::error::{EngineError, EngineResult};

/// Decimal fractional-digit precision matching on-chain 18-decimal fixed point.
pub const DECIMAL_SCALE: u32 = 18;

/// Round a decimal to the on-chain-matching precision using banker's rounding
/// (half-even), as required by spec section 4.2.
pub fn normalize(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_SCALE, RoundingStrategy::MidpointNearestEven)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldState {
    pub planted_at: DateTime<Utc>,
    pub item: ItemName,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeState {
    pub chopped_at: DateTime<Utc>,
    /// Remaining yield on this tree; refills to the catalog default after
    /// the recovery window elapses.
    pub wood: Decimal,
}

/// The central farm aggregate (spec section 3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FarmState {
    pub address: String,
    pub balance: Decimal,
    pub inventory: BTreeMap<ItemName, Decimal>,
    pub stock: BTreeMap<ItemName, Decimal>,
    pub fields: BTreeMap<u32, FieldState>,
    pub trees: BTreeMap<u32, TreeState>,
}

impl FarmState {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            balance: Decimal::ZERO,
            inventory: BTreeMap::new(),
            stock: BTreeMap::new(),
            fields: BTreeMap::new(),
            trees: BTreeMap::new(),
        }
    }

    pub fn inventory_of(&self, item: &str) -> Decimal {
        self.inventory.get(item).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn stock_of(&self, item: &str) -> Decimal {
        self.stock.get(item).copied().unwrap_or(Decimal::ZERO)
    }

    /// Add `amount` of `item` to inventory. Absent entries are created; the
    /// zero-quantity-is-absent invariant (P1) is preserved by `sub_inventory`,
    /// never here, since adding a positive amount can never produce zero.
    pub fn add_inventory(&mut self, item: &str, amount: Decimal) {
        if amount.is_zero() {
            return;
        }
        let entry = self.inventory.entry(item.to_string()).or_insert(Decimal::ZERO);
        *entry = normalize(*entry + amount);
    }

    /// Subtract `amount` of `item` from inventory. Errors if insufficient.
    /// Removes the entry entirely when the result reaches zero.
    pub fn sub_inventory(&mut self, item: &str, amount: Decimal) -> EngineResult<()> {
        let available = self.inventory_of(item);
        if available < amount {
            return Err(EngineError::InsufficientInventory {
                item: item.to_string(),
                required: amount.to_string(),
                available: available.to_string(),
            });
        }
        let remaining = normalize(available - amount);
        if remaining.is_zero() {
            self.inventory.remove(item);
        } else {
            self.inventory.insert(item.to_string(), remaining);
        }
        Ok(())
    }

    pub fn add_balance(&mut self, amount: Decimal) {
        self.balance = normalize(self.balance + amount);
    }

    pub fn sub_balance(&mut self, amount: Decimal) -> EngineResult<()> {
        if self.balance < amount {
            return Err(EngineError::InsufficientBalance {
                required: amount.to_string(),
                available: self.balance.to_string(),
            });
        }
        self.balance = normalize(self.balance - amount);
        Ok(())
    }

    pub fn sub_stock(&mut self, item: &str, amount: Decimal) -> EngineResult<()> {
        let available = self.stock_of(item);
        if available < amount {
            return Err(EngineError::InsufficientStock {
                item: item.to_string(),
                required: amount.to_string(),
                available: available.to_string(),
            });
        }
        let remaining = normalize(available - amount);
        // Stock may legitimately sit at zero (sold out SKU); unlike inventory
        // it is not an "absent vs zero" map, so zero stays present (invariant 5).
        self.stock.insert(item.to_string(), remaining);
        Ok(())
    }
}
