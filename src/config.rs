//! Credential configuration for provisioning providers.
//!
//! The provider distinguishes read-scoped (inventory query) and write-scoped
//! (purchase) credentials, so the config carries a separate pair for each.
//! Configuration is resolved once, before any client is constructed; there is
//! no lazily-initialized global state.

use secrecy::SecretString;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the default account SID.
pub const ENV_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
/// Environment variable holding the default auth token.
pub const ENV_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";

/// Error loading credential configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to parse the config file.
    #[error("failed to parse config file: {0}")]
    Parse(#[source] serde_json::Error),

    /// A required environment variable is missing.
    #[error("environment variable {var} is not set")]
    MissingEnv { var: &'static str },
}

/// A single SID/token credential pair.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialPair {
    /// Account SID.
    pub sid: String,
    /// Auth token. Redacted in Debug output.
    pub token: SecretString,
}

impl CredentialPair {
    /// Create a credential pair.
    pub fn new(sid: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            token: SecretString::from(token.into()),
        }
    }
}

/// Separate credential pairs for query and purchase operations.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Credentials for availability queries (read scope).
    pub query: CredentialPair,
    /// Credentials for number purchases (write scope).
    pub buy: CredentialPair,
}

impl Credentials {
    /// Use the same credential pair for both query and purchase operations.
    pub fn shared(pair: CredentialPair) -> Self {
        Self {
            query: pair.clone(),
            buy: pair,
        }
    }
}

/// Top-level configuration.
///
/// The JSON file shape mirrors the structure below:
///
/// ```json
/// {
///     "creds": {
///         "query": { "sid": "ACxxxx", "token": "..." },
///         "buy":   { "sid": "ACyyyy", "token": "..." }
///     }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Provider credentials.
    pub creds: Credentials,
}

impl Config {
    /// Build a config from an in-memory credentials object.
    pub fn new(creds: Credentials) -> Self {
        Self { creds }
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(ConfigError::Parse)
    }

    /// Build a config from `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN`.
    ///
    /// The single environment pair is used for both query and purchase
    /// operations. This matches the provider SDK's own default and is the
    /// fallback when no explicit config is supplied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let sid = env::var(ENV_ACCOUNT_SID).map_err(|_| ConfigError::MissingEnv {
            var: ENV_ACCOUNT_SID,
        })?;
        let token = env::var(ENV_AUTH_TOKEN).map_err(|_| ConfigError::MissingEnv {
            var: ENV_AUTH_TOKEN,
        })?;
        Ok(Self::new(Credentials::shared(CredentialPair::new(
            sid, token,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_config_json() {
        let json = r#"{
            "creds": {
                "query": { "sid": "AC_query", "token": "secret_q" },
                "buy":   { "sid": "AC_buy",   "token": "secret_b" }
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.creds.query.sid, "AC_query");
        assert_eq!(config.creds.buy.sid, "AC_buy");
        assert_eq!(config.creds.buy.token.expose_secret(), "secret_b");
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let config = Config::new(Credentials::shared(CredentialPair::new(
            "AC123", "super_secret",
        )));
        let debug = format!("{config:?}");
        assert!(!debug.contains("super_secret"));
    }

    #[test]
    fn test_shared_credentials() {
        let creds = Credentials::shared(CredentialPair::new("AC123", "tok"));
        assert_eq!(creds.query.sid, creds.buy.sid);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/config.json"),
            Err(ConfigError::Read { .. })
        ));
    }
}
