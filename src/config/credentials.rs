//! API Credentials - `.env` Loading
//!
//! The three remote services each take one opaque credential. They
//! are read once at startup into an explicit `Credentials` value that
//! is handed to each adapter; nothing reads the environment later.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Environment key of the fiat quoting service API key.
pub const WISE_API_KEY: &str = "WISE_API_KEY";
/// Environment key of the crypto exchange API key.
pub const BINANCE_API_KEY: &str = "BINANCE_API_KEY";
/// Environment key of the NFT marketplace API key.
pub const NFT_MARKETPLACE_API_KEY: &str = "NFT_MARKETPLACE_API_KEY";

/// Credentials for the three remote services.
///
/// An absent key is stored as an empty string: it is not an error
/// here and shows up as an authentication failure from the stage
/// that first uses it.
#[derive(Clone, Default)]
pub struct Credentials {
    wise_api_key: String,
    binance_api_key: String,
    marketplace_api_key: String,
}

impl Credentials {
    pub fn new(
        wise_api_key: impl Into<String>,
        binance_api_key: impl Into<String>,
        marketplace_api_key: impl Into<String>,
    ) -> Self {
        Self {
            wise_api_key: wise_api_key.into(),
            binance_api_key: binance_api_key.into(),
            marketplace_api_key: marketplace_api_key.into(),
        }
    }

    /// Load credentials from a dotenv file.
    ///
    /// The file itself is mandatory. Keys missing from the file fall
    /// back to the process environment, then to empty.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let mut values = HashMap::new();
        for item in dotenvy::from_path_iter(path)
            .with_context(|| format!("Failed to load env file: {}", path.display()))?
        {
            let (key, value) = item
                .with_context(|| format!("Failed to parse env file: {}", path.display()))?;
            values.insert(key, value);
        }

        let lookup = |key: &str| -> String {
            let value = values
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
                .unwrap_or_default();
            if value.is_empty() {
                warn!(key, "Credential not set; the stage using it will fail to authenticate");
            }
            value
        };

        let credentials = Self {
            wise_api_key: lookup(WISE_API_KEY),
            binance_api_key: lookup(BINANCE_API_KEY),
            marketplace_api_key: lookup(NFT_MARKETPLACE_API_KEY),
        };

        info!(path = %path.display(), "Credentials loaded");
        Ok(credentials)
    }

    pub fn wise_api_key(&self) -> &str {
        &self.wise_api_key
    }

    pub fn binance_api_key(&self) -> &str {
        &self.binance_api_key
    }

    pub fn marketplace_api_key(&self) -> &str {
        &self.marketplace_api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() { "<unset>" } else { "<redacted>" }
        }

        f.debug_struct("Credentials")
            .field("wise_api_key", &redact(&self.wise_api_key))
            .field("binance_api_key", &redact(&self.binance_api_key))
            .field("marketplace_api_key", &redact(&self.marketplace_api_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_env_file_is_fatal() {
        let result = Credentials::load(Path::new("definitely-not-here.env"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "WISE_API_KEY=wise-secret").unwrap();
        writeln!(file, "BINANCE_API_KEY=binance-secret").unwrap();
        writeln!(file, "NFT_MARKETPLACE_API_KEY=nft-secret").unwrap();

        let creds = Credentials::load(file.path()).unwrap();
        assert_eq!(creds.wise_api_key(), "wise-secret");
        assert_eq!(creds.binance_api_key(), "binance-secret");
        assert_eq!(creds.marketplace_api_key(), "nft-secret");
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let creds = Credentials::new("wise-secret", "", "nft-secret");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("wise-secret"));
        assert!(!debug.contains("nft-secret"));
        assert!(debug.contains("<unset>"));
    }
}
