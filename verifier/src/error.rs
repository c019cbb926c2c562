use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("shared secret is missing")]
    MissingSecret,

    #[error("score threshold must be a finite number, got {0}")]
    InvalidThreshold(String),

    #[error("invalid verification endpoint {0:?}: {1}")]
    InvalidEndpoint(String, String),

    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("verification endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("verification request timed out: {0}")]
    Timeout(String),

    #[error("HTTP request to verification endpoint failed: {0}")]
    RequestFailed(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("verifier already initialized")]
    AlreadyInitialized,

    #[error("verifier not initialized")]
    NotInitialized,
}

impl VerifyError {
    /// Whether this error came from the network round-trip (as opposed to
    /// setup or misuse of the global verifier).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            VerifyError::Unreachable(_) | VerifyError::Timeout(_) | VerifyError::RequestFailed(_)
        )
    }
}

impl From<reqwest::Error> for VerifyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            VerifyError::Timeout(e.to_string())
        } else if e.is_connect() {
            VerifyError::Unreachable(format!("connection failed: {e}"))
        } else {
            VerifyError::RequestFailed(e.to_string())
        }
    }
}
