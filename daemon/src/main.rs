//! siteverify daemon — serves a reCAPTCHA token form and checks submitted tokens.

mod config;
mod page;
mod server;
mod shutdown;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use siteverify_utils::LogFormat;
use siteverify_verifier::{FailurePolicy, Verifier};

use crate::config::DaemonConfig;
use crate::server::AppState;
use crate::shutdown::ShutdownController;

#[derive(Parser, Debug)]
#[command(name = "siteverify-daemon", about = "reCAPTCHA form verification demo server")]
struct Cli {
    /// Public reCAPTCHA site key rendered into the page.
    #[arg(long, env = "SITEVERIFY_SITE_KEY")]
    site_key: Option<String>,

    /// Private reCAPTCHA secret used to verify tokens.
    #[arg(long, env = "SITEVERIFY_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Minimum accepted score, inclusive.
    #[arg(long, env = "SITEVERIFY_THRESHOLD")]
    threshold: Option<f32>,

    /// Verification request timeout in seconds (0 = client default).
    #[arg(long, env = "SITEVERIFY_TIMEOUT")]
    timeout: Option<u64>,

    /// Verification endpoint URL.
    #[arg(long, env = "SITEVERIFY_ENDPOINT")]
    endpoint: Option<String>,

    /// Reject submissions when the verification endpoint is unreachable.
    /// The env var takes 1/0, true/false, yes/no or on/off.
    #[arg(
        long,
        env = "SITEVERIFY_FAIL_CLOSED",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    fail_closed: bool,

    /// Address to serve the form on.
    #[arg(long, env = "SITEVERIFY_LISTEN")]
    listen: Option<SocketAddr>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SITEVERIFY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "SITEVERIFY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer CLI flags and env vars over `base`.
    fn apply(self, mut base: DaemonConfig) -> DaemonConfig {
        if let Some(site_key) = self.site_key {
            base.site_key = site_key;
        }
        if let Some(secret) = self.secret {
            base.verifier.secret = secret;
        }
        if let Some(threshold) = self.threshold {
            base.verifier.score_threshold = threshold;
        }
        if let Some(timeout) = self.timeout {
            base.verifier.timeout_secs = timeout;
        }
        if let Some(endpoint) = self.endpoint {
            base.verifier.endpoint = endpoint;
        }
        if self.fail_closed {
            base.verifier.failure_policy = FailurePolicy::Closed;
        }
        if let Some(listen) = self.listen {
            base.listen = listen;
        }
        if let Some(level) = self.log_level {
            base.log_level = level;
        }
        if let Some(format) = self.log_format {
            base.log_format = format;
        }
        base
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    let config_path = cli.config.clone();
    let config = cli.apply(base);

    siteverify_utils::init_logging(config.log_format, &config.log_level);
    if let Some(path) = config_path {
        tracing::info!("Loaded config from {}", path.display());
    }

    if config.site_key.trim().is_empty() {
        anyhow::bail!("missing reCAPTCHA site key (--site-key or SITEVERIFY_SITE_KEY)");
    }
    if !page::is_valid_site_key(&config.site_key) {
        anyhow::bail!(
            "invalid reCAPTCHA site key {:?}: only letters, digits, '_' and '-' are allowed",
            config.site_key
        );
    }
    let verifier = Verifier::new(config.verifier.clone())
        .context("invalid verifier configuration (--secret or SITEVERIFY_SECRET)")?;

    tracing::info!(
        "Starting siteverify daemon on {} (threshold {}, timeout {}s, failure policy {:?})",
        config.listen,
        config.verifier.score_threshold,
        verifier.config().timeout().as_secs(),
        config.verifier.failure_policy,
    );

    let state = Arc::new(AppState {
        verifier,
        site_key: config.site_key,
    });

    let shutdown = Arc::new(ShutdownController::new());
    let signal_watcher = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { shutdown.wait_for_signal().await })
    };

    server::serve(config.listen, state, &shutdown)
        .await
        .context("form server failed")?;

    signal_watcher.abort();
    tracing::info!("siteverify daemon exited cleanly");
    Ok(())
}
