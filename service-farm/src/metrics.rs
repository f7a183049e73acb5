// =====================================================================================
// File: service-farm/src/metrics.rs
// Description: Prometheus metrics for save/withdraw traffic
// =====================================================================================

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

#[derive(Clone)]
pub struct FarmMetrics {
    registry: Registry,
    pub saves_attempted_total: IntCounter,
    pub saves_committed_total: IntCounter,
    pub saves_rejected_total: IntCounterVec,
    pub withdrawals_total: IntCounter,
}

impl FarmMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let saves_attempted_total =
            IntCounter::new("farm_saves_attempted_total", "Save requests received").unwrap();
        let saves_committed_total =
            IntCounter::new("farm_saves_committed_total", "Saves successfully persisted").unwrap();
        let saves_rejected_total = IntCounterVec::new(
            Opts::new("farm_saves_rejected_total", "Saves rejected, labeled by error tag"),
            &["reason"],
        )
        .unwrap();
        let withdrawals_total =
            IntCounter::new("farm_withdrawals_total", "Withdrawal requests signed").unwrap();

        registry.register(Box::new(saves_attempted_total.clone())).unwrap();
        registry.register(Box::new(saves_committed_total.clone())).unwrap();
        registry.register(Box::new(saves_rejected_total.clone())).unwrap();
        registry.register(Box::new(withdrawals_total.clone())).unwrap();

        Self {
            registry,
            saves_attempted_total,
            saves_committed_total,
            saves_rejected_total,
            withdrawals_total,
        }
    }

    pub fn gather(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for FarmMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_gather_without_panicking() {
        let metrics = FarmMetrics::new();
        metrics.saves_attempted_total.inc();
        metrics.saves_rejected_total.with_label_values(&["temporal_order"]).inc();
        let output = metrics.gather();
        assert!(output.contains("farm_saves_attempted_total"));
    }
}
