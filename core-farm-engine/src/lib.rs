// =====================================================================================
// File: core-farm-engine/src/lib.rs
// Description: Deterministic action-replay engine and anti-cheat gate for the farm
//              save game. Pure and synchronous: no network, database, or signing I/O
//              lives in this crate (see service-farm for the ports that wrap it).
// =====================================================================================

pub mod action;
pub mod catalog;
pub mod error;
pub mod reconcile;
pub mod save;
pub mod state;
pub mod temporal;
pub mod withdrawal;

pub use action::{dispatch, Action};
pub use catalog::{catalog, Catalog};
pub use error::{EngineError, EngineResult};
pub use reconcile::reconcile;
pub use save::replay_batch;
pub use state::{FarmState, FieldState, TreeState};
pub use withdrawal::{prepare as prepare_withdrawal, WithdrawalPayload};
