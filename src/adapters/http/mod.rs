//! Inbound HTTP Trigger - axum Router
//!
//! Exposes the purchase trigger route plus liveness, readiness and
//! metrics endpoints on a single listener.

pub mod request;
pub mod response;
pub mod router;

pub use response::FailureMessages;
pub use router::{AppState, create_router};
