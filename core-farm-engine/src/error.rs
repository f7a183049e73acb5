// =====================================================================================
// File: core-farm-engine/src/error.rs
// Description: Error types for the deterministic farm save engine
// =====================================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// All error tags the deterministic core can raise.
///
/// Every variant carries a stable, human-readable message so the service
/// layer can surface it verbatim (see spec section 7: errors are terminal,
/// never partially applied).
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EngineError {
    // --- C3: temporal gate ---
    #[error("Events must be in chronological order")]
    TemporalOrder,

    #[error("Event cannot be in the future")]
    TemporalFuture,

    #[error("Event is too old")]
    TemporalPast,

    #[error("Event range is too large")]
    TemporalRange,

    #[error("Event fired too quickly")]
    TemporalGap,

    #[error("Too many events in a short time")]
    TemporalDensity,

    // --- C4: action dispatcher ---
    #[error("Unknown action: {tag}")]
    UnknownAction { tag: String },

    #[error("Unknown item: {item}")]
    UnknownItem { item: String },

    #[error("Insufficient inventory: {item} - required {required}, available {available}")]
    InsufficientInventory {
        item: String,
        required: String,
        available: String,
    },

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: String, available: String },

    #[error("Insufficient stock: {item} - required {required}, available {available}")]
    InsufficientStock {
        item: String,
        required: String,
        available: String,
    },

    #[error("This item is not craftable: {item}")]
    NotCraftable { item: String },

    #[error("This item is not sellable: {item}")]
    NotSellable { item: String },

    #[error("This item is not withdrawable: {item}")]
    NotWithdrawable { item: String },

    #[error("Field is occupied: {index}")]
    FieldOccupied { index: u32 },

    #[error("Field is empty: {index}")]
    FieldEmpty { index: u32 },

    #[error("Crop is not ready to harvest: {index}")]
    NotGrown { index: u32 },

    #[error("Tree has not recovered: {index}")]
    TreeNotRecovered { index: u32 },

    #[error("Invalid index: {index}")]
    InvalidIndex { index: u32 },

    #[error("Item is not redeemable: {item}")]
    NotRedeemable { item: String },

    // --- C7: withdrawal preparer ---
    #[error("ids and amounts must have the same length: {ids_len} != {amounts_len}")]
    WithdrawalShapeMismatch { ids_len: usize, amounts_len: usize },

    // --- C5: reconciler / decimal parsing ---
    #[error("Malformed decimal value: {value}")]
    MalformedDecimal { value: String },
}
