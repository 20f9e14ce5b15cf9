use std::collections::HashMap;

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub checker: CheckerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckerConfig {
    /// Backend verification endpoint. Empty (the default) or a
    /// `mock://`/`emulator://` URL selects the local emulator.
    #[serde(default)]
    pub endpoint: String,
    /// Overall check timeout in milliseconds; individual probes are capped
    /// lower by the evaluator.
    pub timeout_ms: u64,
    /// Directory backing the local key-value store (mock revoked-serial
    /// list). Unset means no store.
    #[serde(default)]
    pub store_dir: Option<String>,
    /// CRL sources to probe when a certificate carries no distribution
    /// points of its own.
    #[serde(default)]
    pub crl_urls: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_ms: 12_000,
            store_dir: None,
            crl_urls: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("checker.endpoint", "")?
            .set_default("checker.timeout_ms", 12_000)?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, use it instead of the system environment.
        // This avoids variable pollution across tests.
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // System environment variables in the format
            // APP_CHECKER__ENDPOINT / APP_CHECKER__TIMEOUT_MS
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}
