//! Health Checks - Liveness and Readiness Checks
//!
//! `/live` answers 200 while the process runs. `/ready` answers 200
//! until graceful shutdown begins, then 503 so load balancers stop
//! sending purchase triggers.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;

/// Shared readiness flag polled by the readiness check.
#[derive(Debug)]
pub struct HealthState {
    /// Whether new purchase triggers are accepted.
    accepting: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Create a new health state (ready by default).
    pub fn new() -> Self {
        Self {
            accepting: AtomicBool::new(true),
        }
    }

    /// Check if the service is ready to serve traffic.
    pub fn is_ready(&self) -> bool {
        self.accepting.load(Ordering::Relaxed)
    }

    /// Flip readiness off at the start of graceful shutdown.
    pub fn mark_draining(&self) {
        self.accepting.store(false, Ordering::Relaxed);
    }

    /// Readiness check response.
    pub fn readiness(&self) -> (StatusCode, &'static str) {
        if self.is_ready() {
            (StatusCode::OK, "READY")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }
}
