//! Wire format of the `siteverify` response body.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// JSON body returned by the verification endpoint.
///
/// Every field is optional on the wire; absent fields take their zero value,
/// so `{"success": false}` parses with `score == 0.0`. Unknown keys are
/// ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct VerificationResponse {
    #[serde(default)]
    pub success: bool,

    /// Trust score in `[0, 1]`, higher is more likely human.
    #[serde(default)]
    pub score: f32,

    /// When the challenge was solved (ISO 8601).
    #[serde(default)]
    pub challenge_ts: Option<DateTime<Utc>>,

    /// Hostname of the site where the challenge was solved.
    #[serde(default)]
    pub hostname: Option<String>,

    /// Action name the widget was executed with.
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

impl VerificationResponse {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Parse a response body, falling back to an unsuccessful zero-score
    /// response when the body is not valid JSON.
    pub fn from_slice_lossy(body: &[u8]) -> Self {
        match Self::from_slice(body) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("verification endpoint returned invalid JSON: {e}");
                Self::default()
            }
        }
    }
}
