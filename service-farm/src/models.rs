// =====================================================================================
// File: service-farm/src/models.rs
// Description: Request/response DTOs for the save and withdraw endpoints
// =====================================================================================

use core_farm_engine::{Action, FarmState};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `POST /save` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveRequest {
    pub farm_id: u64,
    pub session_id: String,
    pub sender: String,
    pub signature: String,
    pub actions: Vec<Action>,
}

/// `POST /save` response body: the committed farm snapshot, matching
/// `{balance, inventory, stock, fields, trees}` with decimals as strings
/// (spec section 6). `FarmState` is returned directly; the session that
/// versions persistence lives in the repository, not the response.
pub type SaveResponse = FarmState;

/// `POST /withdraw` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawRequest {
    pub farm_id: u64,
    pub session_id: String,
    pub sender: String,
    pub signature: String,
    pub sfl: Decimal,
    pub ids: Vec<u32>,
    pub amounts: Vec<String>,
}

/// `POST /withdraw` response body: the signer's response, verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawResponse {
    pub signature: String,
    pub deadline: i64,
    pub tax_bps: u32,
}
