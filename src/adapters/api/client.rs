//! Remote API Client - Authenticated JSON-over-HTTP Client
//!
//! Wraps reqwest with per-service authentication and a request
//! timeout. One client per remote service. Requests are sent exactly
//! once: there is no retry and no backoff, so a failed call is
//! reported to the stage that made it.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::auth::ApiAuth;
use crate::domain::error::TransportError;

/// Longest error body kept in a `TransportError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Configuration for one remote service client.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
  /// Base URL, without trailing slash.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
}

impl ApiClientConfig {
  pub fn new(base_url: &str, timeout: Duration) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      timeout,
    }
  }
}

/// JSON HTTP client for a single remote service.
#[derive(Debug)]
pub struct ApiClient {
  /// Service name for logs.
  service: &'static str,
  /// Underlying HTTP client.
  http: Client,
  /// Credential scheme.
  auth: ApiAuth,
  /// Client configuration.
  config: ApiClientConfig,
}

impl ApiClient {
  /// Create a new client.
  pub fn new(service: &'static str, auth: ApiAuth, config: ApiClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .build()
      .with_context(|| format!("Failed to build HTTP client for {service}"))?;

    Ok(Self {
      service,
      http,
      auth,
      config,
    })
  }

  pub fn service(&self) -> &'static str {
    self.service
  }

  /// GET `path` with query parameters and decode the JSON response.
  pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
    let request = self.http.get(self.url(path)).query(query);
    self.execute(request, "GET", path).await
  }

  /// POST a JSON body to `path` and decode the JSON response.
  pub async fn post_json<T>(&self, path: &str, body: &T) -> Result<Value, TransportError>
  where
    T: Serialize + ?Sized,
  {
    let request = self.http.post(self.url(path)).json(body);
    self.execute(request, "POST", path).await
  }

  /// POST to `path` with parameters in the query string and no body.
  pub async fn post_query(
    &self,
    path: &str,
    query: &[(&str, String)],
  ) -> Result<Value, TransportError> {
    let request = self.http.post(self.url(path)).query(query);
    self.execute(request, "POST", path).await
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url, path)
  }

  /// Send once with auth applied, then check status and decode JSON.
  async fn execute(
    &self,
    request: RequestBuilder,
    method: &str,
    path: &str,
  ) -> Result<Value, TransportError> {
    let endpoint = format!("{method} {path}");

    let response = self.auth.apply(request).send().await.map_err(|e| {
      warn!(service = self.service, endpoint = %endpoint, error = %e, "Request failed");
      if e.is_timeout() {
        TransportError::Timeout {
          endpoint: endpoint.clone(),
          timeout_ms: u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX),
        }
      } else {
        TransportError::Network {
          endpoint: endpoint.clone(),
          source: Box::new(e),
        }
      }
    })?;

    let status = response.status();
    if !status.is_success() {
      let mut body = response.text().await.unwrap_or_default();
      truncate_utf8(&mut body, MAX_ERROR_BODY);
      warn!(
        service = self.service,
        endpoint = %endpoint,
        status = status.as_u16(),
        "Non-success response"
      );
      return Err(TransportError::Status {
        endpoint,
        status: status.as_u16(),
        body,
      });
    }

    let bytes = response.bytes().await.map_err(|e| TransportError::Network {
      endpoint: endpoint.clone(),
      source: Box::new(e),
    })?;

    let value: Value = serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode {
      endpoint: endpoint.clone(),
      reason: e.to_string(),
    })?;

    debug!(service = self.service, endpoint = %endpoint, status = status.as_u16(), "Response received");
    Ok(value)
  }
}

/// Cut `s` to at most `max` bytes on a char boundary.
fn truncate_utf8(s: &mut String, max: usize) {
  if s.len() <= max {
    return;
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  s.truncate(cut);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_base_url_trailing_slash_trimmed() {
    let config = ApiClientConfig::new("https://api.binance.com/", Duration::from_secs(1));
    assert_eq!(config.base_url, "https://api.binance.com");
  }

  #[test]
  fn test_truncate_respects_char_boundary() {
    let mut s = "ab€cd".to_string(); // '€' is 3 bytes at 2..5
    truncate_utf8(&mut s, 3);
    assert_eq!(s, "ab");

    let mut short = "ok".to_string();
    truncate_utf8(&mut short, 10);
    assert_eq!(short, "ok");
  }
}
