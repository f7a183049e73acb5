// =====================================================================================
// File: core-farm-engine/src/reconcile.rs
// Description: Merge authoritative on-chain balance/inventory into farm state (C5)
// =====================================================================================

use rust_decimal::Decimal;

use crate::catalog::catalog;
use crate::error::{EngineError, EngineResult};
use crate::state::{normalize, FarmState};

/// Convert a wei-denominated integer string to a `Decimal` at `decimals`
/// fractional digits.
fn wei_to_decimal(wei: &str, decimals: u32) -> EngineResult<Decimal> {
    let magnitude: Decimal = wei
        .parse()
        .map_err(|_| EngineError::MalformedDecimal { value: wei.to_string() })?;
    let scale = Decimal::from(10u64.pow(decimals.min(18)));
    Ok(normalize(magnitude / scale))
}

/// Reconcile on-chain truth into `farm`, per spec section 4.5:
/// - on-chain balance always overrides the off-chain balance.
/// - for each catalog item with a positive on-chain value, that value
///   overrides the off-chain inventory entry.
/// - items that are zero on-chain retain their off-chain value (not yet
///   withdrawn).
pub fn reconcile(
    farm: &mut FarmState,
    onchain_balance_wei: &str,
    onchain_inventory_wei: &[String],
) -> EngineResult<()> {
    let cat = catalog();

    let balance = wei_to_decimal(onchain_balance_wei, cat.onchain_decimals("SFL"))?;
    farm.balance = balance;

    for (chain_id, wei) in onchain_inventory_wei.iter().enumerate() {
        let Some(name) = cat.name_for_chain_id(chain_id as u32) else {
            continue;
        };
        let decimals = cat.onchain_decimals(name);
        let value = wei_to_decimal(wei, decimals)?;
        if value > Decimal::ZERO {
            farm.inventory.insert(name.to_string(), value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn onchain_balance_overrides_offchain() {
        let mut farm = FarmState::new("0xabc");
        farm.balance = dec!(20);
        reconcile(&mut farm, "120000000000000000000", &[]).unwrap();
        assert_eq!(farm.balance, dec!(120));
    }

    #[test]
    fn zero_onchain_items_retain_offchain_value() {
        let mut farm = FarmState::new("0xabc");
        farm.add_inventory("Sunflower Seed", dec!(4));
        // index 0 -> Sunflower Seed (chain id 0), value zero on-chain.
        reconcile(&mut farm, "0", &["0".to_string()]).unwrap();
        assert_eq!(farm.inventory_of("Sunflower Seed"), dec!(4));
    }

    #[test]
    fn positive_onchain_items_override_offchain() {
        let mut farm = FarmState::new("0xabc");
        reconcile(&mut farm, "0", &["1".to_string(), "2".to_string()]).unwrap();
        assert_eq!(farm.inventory_of("Sunflower Seed"), dec!(1));
        assert_eq!(farm.inventory_of("Sunflower"), dec!(2));
    }
}
