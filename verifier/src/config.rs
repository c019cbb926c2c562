//! Verifier configuration with TOML file support.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The reCAPTCHA verification endpoint.
pub const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Timeout used when the configured `timeout_secs` is zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum score a token needs when no threshold is configured.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;

/// A provider outage lets users through unless configured otherwise.
pub const DEFAULT_FAILURE_POLICY: FailurePolicy = FailurePolicy::Open;

/// What to decide when the verification round-trip itself fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Accept the submission (availability over security).
    #[default]
    Open,
    /// Reject the submission.
    Closed,
}

impl FailurePolicy {
    /// The decision applied on a transport failure.
    pub fn accepts_on_failure(self) -> bool {
        matches!(self, FailurePolicy::Open)
    }
}

/// Configuration for a [`Verifier`](crate::Verifier).
///
/// Can be loaded from a TOML file via [`VerifierConfig::from_toml_file`] or
/// built programmatically with [`VerifierConfig::new`].
#[derive(Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Shared secret issued by the verification provider.
    #[serde(default)]
    pub secret: String,

    /// Minimum accepted score, inclusive. Values outside `[0, 1]` are allowed.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,

    /// Request timeout in seconds. `0` selects [`DEFAULT_TIMEOUT`].
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verification endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Decision applied when the endpoint cannot be reached.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_score_threshold() -> f32 {
    DEFAULT_SCORE_THRESHOLD
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_endpoint() -> String {
    SITEVERIFY_URL.to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl VerifierConfig {
    pub fn new(secret: impl Into<String>, score_threshold: f32, timeout_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            score_threshold,
            timeout_secs,
            endpoint: default_endpoint(),
            failure_policy: DEFAULT_FAILURE_POLICY,
        }
    }

    /// Point the verifier at a different endpoint (staging, local stub).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Effective request timeout.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        }
    }

    /// Parse and check the endpoint URL.
    pub fn endpoint_url(&self) -> Result<reqwest::Url, ConfigError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(self.endpoint.clone(), e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidEndpoint(
                self.endpoint.clone(),
                format!("unsupported scheme {other}"),
            )),
        }
    }

    /// Check the configuration before it is used.
    ///
    /// A threshold outside `[0, 1]` is only warned about: it either accepts
    /// every successful token or none, which may be intentional in tests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if !self.score_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.score_threshold.to_string()));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            tracing::warn!(
                threshold = self.score_threshold,
                "score threshold outside [0, 1]"
            );
        }
        self.endpoint_url()?;
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::new(String::new(), default_score_threshold(), default_timeout_secs())
    }
}

impl fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.secret.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("VerifierConfig")
            .field("secret", &secret)
            .field("score_threshold", &self.score_threshold)
            .field("timeout_secs", &self.timeout_secs)
            .field("endpoint", &self.endpoint)
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}
