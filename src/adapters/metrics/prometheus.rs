//! Prometheus Metrics Registry - Pipeline Observability
//!
//! Counts pipeline runs by outcome and times each stage. Served as
//! text on `/metrics` by the trigger router when enabled.

use std::time::Duration;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::domain::error::Stage;

/// Outcome label for a run that reached `Done`.
pub const OUTCOME_SUCCESS: &str = "success";

/// Prometheus metrics for the purchase pipeline.
///
/// All metrics follow the naming convention `ticket_purchaser_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Pipeline runs by outcome (`success` or the failing stage).
    pub pipeline_runs: IntCounterVec,
    /// Stage wall time in seconds, by stage.
    pub stage_duration: HistogramVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let pipeline_runs = IntCounterVec::new(
            Opts::new(
                "ticket_purchaser_pipeline_runs_total",
                "Purchase pipeline runs by outcome",
            ),
            &["outcome"],
        )?;

        let stage_duration = HistogramVec::new(
            HistogramOpts::new(
                "ticket_purchaser_stage_duration_seconds",
                "Wall time of each pipeline stage",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["stage"],
        )?;

        registry.register(Box::new(pipeline_runs.clone()))?;
        registry.register(Box::new(stage_duration.clone()))?;

        Ok(Self {
            registry,
            pipeline_runs,
            stage_duration,
        })
    }

    /// Record a finished run. `None` means success.
    pub fn record_run(&self, failed_at: Option<Stage>) {
        let outcome = failed_at.map_or(OUTCOME_SUCCESS, Stage::as_str);
        self.pipeline_runs.with_label_values(&[outcome]).inc();
    }

    /// Record how long one stage took.
    pub fn observe_stage(&self, stage: Stage, elapsed: Duration) {
        self.stage_duration
            .with_label_values(&[stage.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_counted_by_outcome() {
        let metrics = MetricsRegistry::new().unwrap();
        metrics.record_run(None);
        metrics.record_run(None);
        metrics.record_run(Some(Stage::Converting));

        assert_eq!(metrics.pipeline_runs.with_label_values(&["success"]).get(), 2);
        assert_eq!(metrics.pipeline_runs.with_label_values(&["conversion"]).get(), 1);
    }

    #[test]
    fn test_render_contains_metric_names() {
        let metrics = MetricsRegistry::new().unwrap();
        metrics.record_run(None);
        metrics.observe_stage(Stage::BuyingTicket, Duration::from_millis(120));

        let text = metrics.render().unwrap();
        assert!(text.contains("ticket_purchaser_pipeline_runs_total"));
        assert!(text.contains("ticket_purchaser_stage_duration_seconds"));
        assert!(text.contains("stage=\"ticket_purchase\""));
    }
}
