//! HTTP surface.
//!
//! - `POST /` takes a submission (any content type; the body must be a JSON
//!   object) and answers `{"status":"success"}` or
//!   `{"status":"error","message":...}`, always with HTTP 200.
//!   A body over [`MAX_BODY_BYTES`] gets the error form too.
//! - `GET /` answers a plain-text liveness line and ignores its query.

use crate::dispatcher::Dispatcher;
use anyhow::Context;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::get;
use axum::{Json, Router};
use intake_core::config::Config;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Largest accepted `POST` body.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Body of every `POST` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmitResponse {
    Success,
    Error { message: String },
}

struct AppState {
    dispatcher: Dispatcher,
    liveness: String,
}

pub struct Server {
    config: Config,
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        let liveness = format!(
            "{} form handler is running. Use POST to submit data.",
            config.notify.brand
        );
        Self {
            config,
            state: Arc::new(AppState {
                dispatcher,
                liveness,
            }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(liveness).post(submit))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .with_state(Arc::clone(&self.state))
    }

    /// Bind `server.bind` and serve until Ctrl-C or SIGTERM.
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.config.server.bind)
            .await
            .with_context(|| format!("binding {}", self.config.server.bind))?;
        tracing::info!(
            addr = %listener.local_addr()?,
            store = %self.config.store.name,
            "intake listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        tracing::info!("intake stopped");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn liveness(State(state): State<Arc<AppState>>) -> String {
    state.liveness.clone()
}

async fn submit(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Json<SubmitResponse> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(status = %rejection.status(), "request body rejected");
            return Json(SubmitResponse::Error {
                message: format!("request body rejected: {}", rejection.body_text()),
            });
        }
    };
    match state.dispatcher.dispatch(&body).await {
        Ok(receipt) => {
            tracing::debug!(row = receipt.row, "submission accepted");
            Json(SubmitResponse::Success)
        }
        Err(e) => {
            tracing::error!(error = %e, "submission failed");
            Json(SubmitResponse::Error {
                message: e.to_string(),
            })
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn response_shapes() {
        assert_eq!(
            serde_json::to_value(SubmitResponse::Success).unwrap(),
            serde_json::json!({"status": "success"})
        );
        assert_eq!(
            serde_json::to_value(SubmitResponse::Error {
                message: "boom".into()
            })
            .unwrap(),
            serde_json::json!({"status": "error", "message": "boom"})
        );
    }
}
