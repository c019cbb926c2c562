//! Process-wide verifier for callers that initialise once at startup and
//! confirm from anywhere afterwards.
//!
//! Prefer owning a [`Verifier`] (and sharing it by `Arc`) where that is
//! convenient; this module exists for integrations that cannot thread one
//! through.

use std::sync::OnceLock;

use crate::client::Verifier;
use crate::config::VerifierConfig;
use crate::decision::Decision;
use crate::error::VerifyError;

static GLOBAL_VERIFIER: OnceLock<Verifier> = OnceLock::new();

/// Install the process-wide verifier.
///
/// Must be called once, before any [`confirm`]. A second call fails with
/// [`VerifyError::AlreadyInitialized`] and leaves the first configuration
/// in place.
pub fn init(config: VerifierConfig) -> Result<(), VerifyError> {
    if GLOBAL_VERIFIER.get().is_some() {
        return Err(VerifyError::AlreadyInitialized);
    }
    let verifier = Verifier::new(config)?;
    GLOBAL_VERIFIER
        .set(verifier)
        .map_err(|_| VerifyError::AlreadyInitialized)
}

/// The process-wide verifier, if [`init`] has succeeded.
pub fn global() -> Option<&'static Verifier> {
    GLOBAL_VERIFIER.get()
}

/// Verify `token` with the process-wide verifier.
pub async fn confirm(token: &str, source_addr: &str) -> Result<Decision, VerifyError> {
    let verifier = global().ok_or(VerifyError::NotInitialized)?;
    Ok(verifier.confirm(token, source_addr).await)
}
