//! Threshold decision and the per-call result.

use std::fmt;

use crate::config::FailurePolicy;
use crate::error::VerifyError;
use crate::response::VerificationResponse;

/// Which path a verification took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Valid token scoring at or above the threshold.
    Accepted,
    /// Valid token scoring below the threshold.
    LowScore,
    /// The provider rejected the token, or its reply was unusable.
    InvalidToken,
    /// The round-trip to the provider did not complete.
    TransportFailure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::LowScore => "low_score",
            Outcome::InvalidToken => "invalid_token",
            Outcome::TransportFailure => "transport_failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply the score threshold to a completed verification.
///
/// The comparison is inclusive: a score equal to the threshold is accepted.
pub fn decide(response: &VerificationResponse, threshold: f32) -> Outcome {
    if !response.success {
        Outcome::InvalidToken
    } else if response.score >= threshold {
        Outcome::Accepted
    } else {
        Outcome::LowScore
    }
}

/// Result of a single [`Verifier::confirm`](crate::Verifier::confirm) call.
#[derive(Clone, Debug)]
pub struct Decision {
    /// Whether the submission should be let through.
    pub accepted: bool,
    pub outcome: Outcome,
    /// Score reported by the provider, `0.0` when absent or unavailable.
    pub score: f32,
    /// Provider error codes, if any.
    pub error_codes: Vec<String>,
    /// Set only when `outcome` is [`Outcome::TransportFailure`].
    pub error: Option<VerifyError>,
}

impl Decision {
    pub(crate) fn from_response(response: VerificationResponse, threshold: f32) -> Self {
        let outcome = decide(&response, threshold);
        Self {
            accepted: outcome == Outcome::Accepted,
            outcome,
            score: response.score,
            error_codes: response.error_codes,
            error: None,
        }
    }

    pub(crate) fn transport_failure(error: VerifyError, policy: FailurePolicy) -> Self {
        Self {
            accepted: policy.accepts_on_failure(),
            outcome: Outcome::TransportFailure,
            score: 0.0,
            error_codes: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Split into the boolean decision and the transport error, if any.
    pub fn into_parts(self) -> (bool, Option<VerifyError>) {
        (self.accepted, self.error)
    }
}
