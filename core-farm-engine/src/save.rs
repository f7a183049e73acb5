// =====================================================================================
// File: core-farm-engine/src/save.rs
// Description: Pure replay pipeline: temporal gate + fold of dispatch (C6, I/O-free half)
// =====================================================================================

use chrono::{DateTime, Utc};
use tracing::{trace, warn};

use crate::action::{assert_no_new_limited_items, dispatch, Action};
use crate::error::EngineResult;
use crate::state::FarmState;
use crate::temporal::check_batch;

/// Replay `actions` against `farm`, producing the resulting state.
///
/// Runs the temporal gate (C3) over the whole batch first — any violation
/// leaves `farm` conceptually untouched, since this function never mutates
/// its argument and only ever returns a fresh state on success (P4). Then
/// folds the dispatcher (C4) over the batch in order, failing the whole
/// batch on the first action-level error (no partial application).
pub fn replay_batch(farm: FarmState, actions: &[Action], now: DateTime<Utc>) -> EngineResult<FarmState> {
    let timestamps: Vec<DateTime<Utc>> = actions.iter().map(Action::created_at).collect();
    if let Err(err) = check_batch(&timestamps, now) {
        warn!(address = %farm.address, actions = actions.len(), error = %err, "batch rejected by temporal gate");
        return Err(err);
    }

    let mut state = farm.clone();
    for (i, action) in actions.iter().enumerate() {
        state = dispatch(&state, action, now).map_err(|err| {
            warn!(address = %farm.address, index = i, error = %err, "batch rejected by dispatcher");
            err
        })?;
    }

    assert_no_new_limited_items(&farm, &state)?;
    trace!(address = %farm.address, actions = actions.len(), "batch replayed");
    Ok(state)
}
