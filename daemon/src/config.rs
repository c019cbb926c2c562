//! Daemon configuration with TOML file support.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use siteverify_utils::LogFormat;
use siteverify_verifier::VerifierConfig;

/// Configuration for the demo daemon.
///
/// ```toml
/// listen = "0.0.0.0:9001"
/// site_key = "6Lc..."
///
/// [verifier]
/// secret = "6Lc..."
/// score_threshold = 0.5
/// timeout_secs = 10
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address the form server binds to.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Public reCAPTCHA site key, embedded in the page.
    #[serde(default)]
    pub site_key: String,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub verifier: VerifierConfig,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9001))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            site_key: String::new(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            verifier: VerifierConfig::default(),
        }
    }
}
