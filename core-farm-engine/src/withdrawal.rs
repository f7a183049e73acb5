// =====================================================================================
// File: core-farm-engine/src/withdrawal.rs
// Description: Withdrawal tax computation and payload assembly (C7)
// =====================================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::catalog;
use crate::error::{EngineError, EngineResult};

/// The payload handed to the external signer facade. The core never signs
/// it itself (spec section 1 Non-goals).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalPayload {
    pub sender: String,
    pub farm_id: u64,
    pub session_id: String,
    pub sfl: Decimal,
    pub ids: Vec<u32>,
    pub amounts: Vec<String>,
    /// Tax in basis points (1% == 100 bps).
    pub tax_bps: u32,
}

/// Build the signer payload for a withdrawal request.
///
/// Preserves two source-observed quirks verbatim (see DESIGN.md): an empty
/// `ids`/`amounts` pair is a legal no-op withdrawal that still produces a
/// signature, and `ids.len() == amounts.len()` is asserted here as
/// defence-in-depth even though the on-chain contract is expected to check
/// it too.
pub fn prepare(
    sender: &str,
    farm_id: u64,
    session_id: &str,
    sfl: Decimal,
    ids: &[u32],
    amounts: &[String],
) -> EngineResult<WithdrawalPayload> {
    if ids.len() != amounts.len() {
        return Err(EngineError::WithdrawalShapeMismatch {
            ids_len: ids.len(),
            amounts_len: amounts.len(),
        });
    }

    let cat = catalog();
    for id in ids {
        if !cat.is_withdrawable(*id) {
            return Err(EngineError::NotWithdrawable {
                item: cat.name_for_chain_id(*id).unwrap_or("<unknown>").to_string(),
            });
        }
    }

    let tax_bps = cat.withdrawal_tax_bps(sfl);

    Ok(WithdrawalPayload {
        sender: sender.to_string(),
        farm_id,
        session_id: session_id.to_string(),
        sfl,
        ids: ids.to_vec(),
        amounts: amounts.to_vec(),
        tax_bps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_withdrawal_is_a_legal_no_op() {
        let payload = prepare("0xabc", 1, "session", dec!(0), &[], &[]).unwrap();
        assert!(payload.ids.is_empty());
        assert!(payload.amounts.is_empty());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let err = prepare("0xabc", 1, "session", dec!(0), &[7], &[]).unwrap_err();
        assert!(matches!(err, EngineError::WithdrawalShapeMismatch { .. }));
    }

    #[test]
    fn non_withdrawable_id_is_rejected() {
        // chain id 1 -> Sunflower, not in the withdrawable set.
        let err = prepare("0xabc", 1, "session", dec!(5), &[1], &["1".to_string()]).unwrap_err();
        assert!(matches!(err, EngineError::NotWithdrawable { .. }));
    }

    #[test]
    fn tax_scales_with_sfl_bracket() {
        let payload = prepare("0xabc", 1, "session", dec!(5), &[7], &["1000000000000000000".to_string()]).unwrap();
        assert_eq!(payload.tax_bps, 3000);

        let payload = prepare("0xabc", 1, "session", dec!(5000), &[7], &["1000000000000000000".to_string()]).unwrap();
        assert_eq!(payload.tax_bps, 500);
    }
}
