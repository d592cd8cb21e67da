//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` against the
//! remote services, and exposes the pipeline over HTTP.
//!
//! Adapter categories:
//! - `api`: outbound REST clients (quotes, exchange, marketplace)
//! - `http`: inbound trigger router (axum)
//! - `metrics`: Prometheus metrics export and health checks

pub mod api;
pub mod http;
pub mod metrics;
