//! Axum form server: renders the token page and checks submitted tokens.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    response::Html,
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use siteverify_verifier::Verifier;
use tracing::{info, warn};

use crate::page::{self, Notice};
use crate::shutdown::ShutdownController;

/// Shared state for the form server.
pub struct AppState {
    pub verifier: Verifier,
    /// Public site key embedded in the widget script.
    pub site_key: String,
}

#[derive(Debug, Deserialize)]
struct Submission {
    #[serde(rename = "g-recaptcha-response")]
    token: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_page).post(submit))
        .with_state(state)
}

/// Bind `listen` and serve until `shutdown` fires.
///
/// The shutdown subscription is taken on first poll, before binding.
pub async fn serve(
    listen: SocketAddr,
    state: Arc<AppState>,
    shutdown: &ShutdownController,
) -> std::io::Result<()> {
    let mut rx = shutdown.subscribe();
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("form server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = rx.recv().await;
    })
    .await
}

async fn home_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render(&state.site_key, None))
}

async fn submit(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    Form(submission): Form<Submission>,
) -> Html<String> {
    let notice = match submission.token {
        Some(token) => {
            let source = peer
                .map(|ConnectInfo(addr)| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let decision = state.verifier.confirm(&token, &source).await;
            if let Some(e) = &decision.error {
                warn!("recaptcha server error: {e}");
            }
            if decision.accepted {
                Notice::Ack("reCAPTCHA was correct!".to_string())
            } else {
                Notice::Error("reCAPTCHA was incorrect; try again.".to_string())
            }
        }
        None => Notice::Error("No reCAPTCHA token was submitted.".to_string()),
    };
    Html(page::render(&state.site_key, Some(&notice)))
}
