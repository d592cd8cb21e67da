//! Request Authentication - Per-Service Credential Schemes
//!
//! The quoting service and the marketplace take a bearer token; the
//! exchange takes its API key in `X-MBX-APIKEY`. Public market-data
//! reads go out without credentials.

use std::fmt;

use reqwest::RequestBuilder;

/// Binance API key header.
pub const BINANCE_API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// How a request to one remote service is authenticated.
#[derive(Clone)]
pub enum ApiAuth {
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// API key carried in a service-specific header.
    ApiKeyHeader {
        header: &'static str,
        key: String,
    },
    /// Unauthenticated (public endpoints).
    None,
}

impl ApiAuth {
    /// Bearer token auth.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Binance-style API key header auth.
    pub fn binance_key(key: impl Into<String>) -> Self {
        Self::ApiKeyHeader {
            header: BINANCE_API_KEY_HEADER,
            key: key.into(),
        }
    }

    /// Attach the credential to an outgoing request.
    ///
    /// An empty credential is still sent, so the remote service
    /// reports the authentication failure rather than this process.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Bearer(token) => request.bearer_auth(token),
            Self::ApiKeyHeader { header, key } => request.header(*header, key),
            Self::None => request,
        }
    }
}

impl fmt::Debug for ApiAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Self::ApiKeyHeader { header, .. } => write!(f, "ApiKeyHeader({header}: <redacted>)"),
            Self::None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_applied() {
        let client = reqwest::Client::new();
        let request = ApiAuth::bearer("tok")
            .apply(client.get("http://localhost/x"))
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer tok");
    }

    #[test]
    fn test_binance_key_header_applied() {
        let client = reqwest::Client::new();
        let request = ApiAuth::binance_key("k1")
            .apply(client.post("http://localhost/x"))
            .build()
            .unwrap();
        assert_eq!(request.headers()[BINANCE_API_KEY_HEADER], "k1");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let debug = format!("{:?}", ApiAuth::bearer("super-secret"));
        assert!(!debug.contains("super-secret"));
    }
}
