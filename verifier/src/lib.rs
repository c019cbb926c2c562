//! Human-vs-bot verification against the reCAPTCHA `siteverify` endpoint.
//!
//! A [`Verifier`] relays a client-supplied challenge token to the
//! verification service, compares the returned trust score against the
//! configured threshold, and returns a [`Decision`].
//!
//! Design:
//! - Configuration is an immutable [`VerifierConfig`] captured at construction.
//! - Transport failures never leak into shared state; they are part of the
//!   per-call [`Decision`].
//! - A transport failure is accepted or rejected according to the configured
//!   [`FailurePolicy`] (fail-open by default, see [`DEFAULT_FAILURE_POLICY`]).
//! - An unreadable or malformed response body is an ordinary rejection.

pub mod client;
pub mod config;
pub mod decision;
pub mod error;
pub mod global;
pub mod response;

pub use client::Verifier;
pub use config::{
    FailurePolicy, VerifierConfig, DEFAULT_FAILURE_POLICY, DEFAULT_SCORE_THRESHOLD,
    DEFAULT_TIMEOUT, SITEVERIFY_URL,
};
pub use decision::{decide, Decision, Outcome};
pub use error::{ConfigError, VerifyError};
pub use global::{confirm, init};
pub use response::VerificationResponse;
