mod common;

use std::io;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use siteverify_verifier::{Verifier, VerifierConfig};

use common::{refused_endpoint, StubEndpoint};

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn captcha_lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .filter(|line| line.contains("captcha:"))
            .map(str::to_string)
            .collect()
    }
}

/// Run one `confirm` against `endpoint` and return the captcha log lines it produced.
async fn confirm_and_capture(endpoint: &str, source: &str) -> Vec<String> {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let verifier =
        Verifier::new(VerifierConfig::new("SOME_KEY", 0.5, 2).with_endpoint(endpoint)).unwrap();
    verifier.confirm("test", source).await;

    buffer.captcha_lines()
}

#[tokio::test]
async fn accepted_token_logs_one_record() {
    let stub = StubEndpoint::start(StatusCode::OK, r#"{"success": true, "score": 0.9}"#).await;
    let lines = confirm_and_capture(&stub.url, "1.2.3.4").await;

    assert_eq!(lines.len(), 1, "{lines:?}");
    let line = &lines[0];
    assert!(line.contains("INFO"));
    assert!(line.contains("captcha: valid token with score 0.90"));
    assert!(line.contains("outcome=accepted"));
    assert!(line.contains("source=1.2.3.4"));
}

#[tokio::test]
async fn low_score_logs_score_and_threshold() {
    let stub = StubEndpoint::start(StatusCode::OK, r#"{"success": true, "score": 0.3}"#).await;
    let lines = confirm_and_capture(&stub.url, "9.9.9.9").await;

    assert_eq!(lines.len(), 1, "{lines:?}");
    let line = &lines[0];
    assert!(line.contains("refused due to low score (got 0.30, expected 0.50)"));
    assert!(line.contains("outcome=low_score"));
    assert!(line.contains("threshold=0.5"));
    assert!(line.contains("source=9.9.9.9"));
}

#[tokio::test]
async fn invalid_token_logs_error_codes() {
    let stub = StubEndpoint::start(
        StatusCode::OK,
        r#"{"success": false, "error-codes": ["invalid-input-response"]}"#,
    )
    .await;
    let lines = confirm_and_capture(&stub.url, "5.6.7.8").await;

    assert_eq!(lines.len(), 1, "{lines:?}");
    let line = &lines[0];
    assert!(line.contains("captcha: invalid token"));
    assert!(line.contains("outcome=invalid_token"));
    assert!(line.contains("invalid-input-response"));
}

#[tokio::test]
async fn transport_failure_logs_warning_with_policy() {
    let lines = confirm_and_capture(&refused_endpoint(), "10.0.0.1").await;

    assert_eq!(lines.len(), 1, "{lines:?}");
    let line = &lines[0];
    assert!(line.contains("WARN"));
    assert!(line.contains("captcha: verification endpoint failure"));
    assert!(line.contains("outcome=transport_failure"));
    assert!(line.contains("accepted=true"));
    assert!(line.contains("policy=Open"));
}
