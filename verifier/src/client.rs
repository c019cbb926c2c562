//! HTTP client for the `siteverify` endpoint.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::VerifierConfig;
use crate::decision::{Decision, Outcome};
use crate::error::VerifyError;
use crate::response::VerificationResponse;

/// Connection timeout, capped by the request timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Turns challenge tokens into trust decisions.
///
/// Sends `POST {endpoint}` with form fields `secret` and `response`, then
/// applies the configured score threshold to the reply. Holds no per-call
/// state, so one instance can be shared (e.g. behind an `Arc`) by every
/// request handler.
pub struct Verifier {
    config: VerifierConfig,
    endpoint: reqwest::Url,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
}

impl Verifier {
    /// Validate `config` and build a verifier around it.
    pub fn new(config: VerifierConfig) -> Result<Self, VerifyError> {
        config.validate()?;
        let endpoint = config.endpoint_url()?;
        let timeout = config.timeout();

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| VerifyError::Client(e.to_string()))?;

        debug!(?config, "verifier configured");
        Ok(Self {
            config,
            endpoint,
            http_client,
        })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify `token` and decide whether the submission is human.
    ///
    /// `source_addr` identifies the submitter in the log record only; it is
    /// not sent to the provider. The returned decision is always well
    /// defined: on a transport failure it follows the configured
    /// [`FailurePolicy`](crate::FailurePolicy) and carries the error.
    pub async fn confirm(&self, token: &str, source_addr: &str) -> Decision {
        let decision = match self.check(token).await {
            Ok(response) => Decision::from_response(response, self.config.score_threshold),
            Err(e) => Decision::transport_failure(e, self.config.failure_policy),
        };
        self.log_decision(source_addr, &decision);
        decision
    }

    /// Perform the round-trip.
    ///
    /// Only failures to complete the exchange are returned as `Err`. Any
    /// HTTP status is accepted and its body parsed; an unreadable or
    /// malformed body yields an unsuccessful default response.
    async fn check(&self, token: &str) -> Result<VerificationResponse, VerifyError> {
        let params = [("secret", self.config.secret.as_str()), ("response", token)];

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "verification endpoint returned non-success status");
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return Err(e.into()),
            Err(e) => {
                warn!("could not read verification response body: {e}");
                return Ok(VerificationResponse::default());
            }
        };

        let payload = VerificationResponse::from_slice_lossy(&body);
        debug!(?payload, "captcha payload");
        Ok(payload)
    }

    fn log_decision(&self, source_addr: &str, decision: &Decision) {
        let score = decision.score;
        let outcome = decision.outcome;
        match decision.outcome {
            Outcome::Accepted => {
                info!(
                    source = %source_addr,
                    %outcome,
                    score,
                    "captcha: valid token with score {score:.2}"
                );
            }
            Outcome::LowScore => {
                let threshold = self.config.score_threshold;
                info!(
                    source = %source_addr,
                    %outcome,
                    score,
                    threshold,
                    "captcha: valid token refused due to low score (got {score:.2}, expected {threshold:.2})"
                );
            }
            Outcome::InvalidToken => {
                info!(
                    source = %source_addr,
                    %outcome,
                    error_codes = ?decision.error_codes,
                    "captcha: invalid token"
                );
            }
            Outcome::TransportFailure => {
                let error = decision
                    .error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                warn!(
                    source = %source_addr,
                    %outcome,
                    accepted = decision.accepted,
                    policy = ?self.config.failure_policy,
                    "captcha: verification endpoint failure: {error}"
                );
            }
        }
    }
}
