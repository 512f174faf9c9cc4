//! Telemetry and observability for the prompt compiler runtime.

use crate::config::TelemetryConfig;
use std::collections::HashMap;
use std::sync::RwLock;

/// Monotonic counter sink consumed by the pipeline.
///
/// The pipeline only ever increments counters; a no-op sink is substitutable
/// with zero behavioral difference to the orchestration logic.
pub trait MetricsSink: Send + Sync {
    fn add(&self, counter: &str, amount: u64, tags: &[(&str, String)]);
}

/// In-process counter collector.
///
/// Uses `RwLock` for thread-safe interior mutability so independent pipeline
/// runs can share one sink across async tasks.
pub struct PipelineTelemetry {
    config: TelemetryConfig,
    counters: RwLock<HashMap<String, u64>>,
}

impl PipelineTelemetry {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            config: config.clone(),
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// Sum of a counter across all tag combinations.
    pub fn counter_total(&self, counter: &str) -> u64 {
        let prefix = format!("{}{{", counter);
        let counters = self.counters.read().unwrap();
        counters
            .iter()
            .filter(|(key, _)| *key == counter || key.starts_with(&prefix))
            .map(|(_, value)| value)
            .sum()
    }

    /// Current counter values, keyed by name plus rendered tags.
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counters.read().unwrap().clone()
    }

    fn key_for(counter: &str, tags: &[(&str, String)]) -> String {
        if tags.is_empty() {
            return counter.to_string();
        }

        let rendered = tags
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}{{{}}}", counter, rendered)
    }
}

impl MetricsSink for PipelineTelemetry {
    fn add(&self, counter: &str, amount: u64, tags: &[(&str, String)]) {
        // `enabled` is the master switch over all telemetry concerns.
        if !self.config.enabled || !self.config.metrics_enabled {
            return;
        }

        tracing::debug!("Counter {} += {}", counter, amount);
        let key = Self::key_for(counter, tags);
        *self.counters.write().unwrap().entry(key).or_insert(0) += amount;
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn add(&self, _counter: &str, _amount: u64, _tags: &[(&str, String)]) {}
}

/// Install a global `tracing` subscriber honoring `RUST_LOG`.
///
/// No-op when tracing is switched off in the configuration. Safe to call
/// more than once; later calls are ignored.
pub fn init_tracing(config: &TelemetryConfig) {
    use tracing_subscriber::EnvFilter;

    if !config.enabled || !config.tracing_enabled {
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_per_tag_combination() {
        let telemetry = PipelineTelemetry::new(&TelemetryConfig::default());
        telemetry.add("compiler.pipeline.success", 1, &[]);
        telemetry.add(
            "compiler.pipeline.success",
            1,
            &[("status", "fallback".to_string())],
        );
        telemetry.add(
            "compiler.pipeline.success",
            1,
            &[("status", "fallback".to_string())],
        );

        assert_eq!(telemetry.counter_total("compiler.pipeline.success"), 3);
        let snapshot = telemetry.snapshot();
        assert_eq!(
            snapshot.get("compiler.pipeline.success{status=fallback}"),
            Some(&2)
        );
    }

    #[test]
    fn disabled_metrics_record_nothing() {
        let config = TelemetryConfig {
            metrics_enabled: false,
            ..TelemetryConfig::default()
        };
        let telemetry = PipelineTelemetry::new(&config);
        telemetry.add("compiler.pipeline.runs", 1, &[]);
        assert_eq!(telemetry.counter_total("compiler.pipeline.runs"), 0);
    }

    #[test]
    fn master_switch_overrides_metrics_enabled() {
        let config = TelemetryConfig {
            enabled: false,
            metrics_enabled: true,
            ..TelemetryConfig::default()
        };
        let telemetry = PipelineTelemetry::new(&config);
        telemetry.add("compiler.pipeline.runs", 1, &[]);
        assert_eq!(telemetry.counter_total("compiler.pipeline.runs"), 0);
    }
}
