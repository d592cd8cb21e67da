//! Trigger router.
//!
//! - `POST <route>`  Runs one purchase pipeline
//! - `GET /live`     Liveness check: 200 while the process runs
//! - `GET /ready`    Readiness check: 503 once shutdown begins
//! - `GET /metrics`  Prometheus text format (when enabled)

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tracing::{error, warn};

use super::request::{amount_field, parse_amount};
use super::response::{FailureMessages, failure, success};
use crate::adapters::metrics::{HealthState, MetricsRegistry};
use crate::usecases::PurchasePipeline;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
  pipeline: Arc<PurchasePipeline>,
  health: Arc<HealthState>,
  /// `None` when metrics export is disabled.
  metrics: Option<Arc<MetricsRegistry>>,
  messages: Arc<FailureMessages>,
  amount_field: Arc<str>,
}

impl AppState {
  pub fn new(
    pipeline: Arc<PurchasePipeline>,
    health: Arc<HealthState>,
    metrics: Option<Arc<MetricsRegistry>>,
  ) -> Self {
    let settings = pipeline.settings();
    let field = amount_field(&settings.source_currency);
    let messages = FailureMessages::new(&settings.source_currency, &settings.target_currency, &field);

    Self {
      pipeline,
      health,
      metrics,
      messages: Arc::new(messages),
      amount_field: field.into(),
    }
  }
}

/// Build the trigger router with `route` as the purchase path.
pub fn create_router(state: AppState, route: &str) -> Router {
  let mut router = Router::new()
    .route(route, post(purchase_ticket).fallback(method_not_allowed))
    .route("/live", get(|| async { StatusCode::OK }))
    .route("/ready", get(ready));

  if state.metrics.is_some() {
    router = router.route("/metrics", get(render_metrics));
  }

  router.with_state(state)
}

async fn purchase_ticket(
  State(state): State<AppState>,
  body: Result<Bytes, BytesRejection>,
) -> Response {
  let body = match body {
    Ok(body) => body,
    Err(rejection) => {
      warn!(error = %rejection, "Could not read trigger body");
      return (StatusCode::BAD_REQUEST, state.messages.unreadable_body.clone()).into_response();
    }
  };

  let amount = match parse_amount(&body, &state.amount_field) {
    Ok(amount) => amount,
    Err(e) => {
      warn!(error = %e, field = %state.amount_field, "Rejected purchase trigger");
      return failure(&state.messages, &e.into());
    }
  };

  match state.pipeline.purchase(amount).await {
    Ok(receipt) => success(&receipt),
    Err(e) => failure(&state.messages, &e),
  }
}

async fn method_not_allowed(State(state): State<AppState>) -> Response {
  (
    StatusCode::METHOD_NOT_ALLOWED,
    [(header::ALLOW, "POST")],
    state.messages.method_not_allowed.clone(),
  )
    .into_response()
}

async fn ready(State(state): State<AppState>) -> impl IntoResponse {
  state.health.readiness()
}

async fn render_metrics(State(state): State<AppState>) -> Response {
  let Some(metrics) = state.metrics.as_ref() else {
    return StatusCode::NOT_FOUND.into_response();
  };

  match metrics.render() {
    Ok(text) => (
      StatusCode::OK,
      [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
      text,
    )
      .into_response(),
    Err(e) => {
      error!(error = %e, "Failed to encode metrics");
      StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
  }
}
