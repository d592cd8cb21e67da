//! Metrics and Monitoring Adapters
//!
//! Provides the Prometheus registry recorded by the pipeline and the
//! readiness state behind the `/live` and `/ready` checks. Both are
//! served by the trigger router.

pub mod health;
pub mod prometheus;

pub use health::HealthState;
pub use prometheus::MetricsRegistry;
