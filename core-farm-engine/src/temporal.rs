// =====================================================================================
// File: core-farm-engine/src/temporal.rs
// Description: Batch timing plausibility checks (C3)
// =====================================================================================

use chrono::{DateTime, Duration, Utc};

use crate::error::{EngineError, EngineResult};

/// Allowed clock skew for the last action relative to wall-clock `now`.
pub const MAX_CLOCK_SKEW: Duration = Duration::seconds(60);

/// How far in the past the first action in a batch may be.
pub const MAX_EVENT_AGE: Duration = Duration::minutes(5);

/// Maximum span between the first and last action in a batch.
pub const MAX_BATCH_RANGE: Duration = Duration::minutes(2);

/// Minimum gap required between two consecutive actions.
pub const MIN_EVENT_GAP: Duration = Duration::milliseconds(10);

/// Sliding window width used by the density cap.
pub const DENSITY_WINDOW: Duration = Duration::milliseconds(300);

/// Maximum number of actions allowed inside any `DENSITY_WINDOW`.
pub const DENSITY_MAX: usize = 2;

/// Validate the timing of a batch of action timestamps relative to `now`.
///
/// Timestamps are passed independently of the `Action` payload so this gate
/// has no dependency on C4's action shape.
pub fn check_batch(timestamps: &[DateTime<Utc>], now: DateTime<Utc>) -> EngineResult<()> {
    let Some(first) = timestamps.first() else {
        return Ok(());
    };
    let last = timestamps.last().expect("non-empty checked above");

    for pair in timestamps.windows(2) {
        if pair[0] > pair[1] {
            return Err(EngineError::TemporalOrder);
        }
    }

    if *last > now + MAX_CLOCK_SKEW {
        return Err(EngineError::TemporalFuture);
    }

    if *first < now - MAX_EVENT_AGE {
        return Err(EngineError::TemporalPast);
    }

    if *last - *first > MAX_BATCH_RANGE {
        return Err(EngineError::TemporalRange);
    }

    for pair in timestamps.windows(2) {
        if pair[1] - pair[0] < MIN_EVENT_GAP {
            return Err(EngineError::TemporalGap);
        }
    }

    for window_start in timestamps {
        let window_end = *window_start + DENSITY_WINDOW;
        let count = timestamps
            .iter()
            .filter(|t| **t >= *window_start && **t < window_end)
            .count();
        if count > DENSITY_MAX {
            return Err(EngineError::TemporalDensity);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(offset_ms: i64) -> DateTime<Utc> {
        Utc::now() + Duration::milliseconds(offset_ms)
    }

    #[test]
    fn out_of_order_is_rejected() {
        let now = Utc::now();
        let timestamps = vec![now, now - Duration::milliseconds(50)];
        let err = check_batch(&timestamps, now).unwrap_err();
        assert_eq!(err, EngineError::TemporalOrder);
    }

    #[test]
    fn future_event_is_rejected() {
        let now = Utc::now();
        let timestamps = vec![now + Duration::seconds(120)];
        let err = check_batch(&timestamps, now).unwrap_err();
        assert_eq!(err, EngineError::TemporalFuture);
    }

    #[test]
    fn too_old_event_is_rejected() {
        let now = Utc::now();
        let timestamps = vec![now - Duration::minutes(10)];
        let err = check_batch(&timestamps, now).unwrap_err();
        assert_eq!(err, EngineError::TemporalPast);
    }

    #[test]
    fn range_too_large_is_rejected() {
        let now = Utc::now();
        let timestamps = vec![now - Duration::minutes(3), now];
        let err = check_batch(&timestamps, now).unwrap_err();
        assert_eq!(err, EngineError::TemporalRange);
    }

    #[test]
    fn minimum_gap_is_enforced() {
        let now = Utc::now();
        let timestamps = vec![now - Duration::milliseconds(5), now];
        let err = check_batch(&timestamps, now).unwrap_err();
        assert_eq!(err, EngineError::TemporalGap);
    }

    #[test]
    fn density_cap_rejects_three_events_in_window() {
        let now = t(0);
        let timestamps = vec![
            now - Duration::milliseconds(200),
            now - Duration::milliseconds(100),
            now - Duration::milliseconds(20),
        ];
        let err = check_batch(&timestamps, now).unwrap_err();
        assert_eq!(err, EngineError::TemporalDensity);
    }

    #[test]
    fn well_formed_batch_passes() {
        let now = Utc::now();
        let timestamps = vec![now - Duration::milliseconds(60), now];
        assert!(check_batch(&timestamps, now).is_ok());
    }
}
