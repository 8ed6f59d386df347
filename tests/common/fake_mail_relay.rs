//! Fake HTTP mail relay for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `POST /send` — accepts a JSON message and stores it in the inbox
//!
//! Individual recipients can be configured to be refused with a 550, so a
//! test can fail one notification while the other goes through.
//!
//! # Example
//!
//! ```rust,no_run
//! let relay = FakeMailRelay::start().await.unwrap();
//! relay.refuse("ops@desiarms.com").await;
//!
//! // Point the RelayMailer at relay.send_url()
//! let url = relay.send_url();
//! ```

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// State shared between the router and test code.
#[derive(Default)]
struct RelayState {
    inbox: Vec<serde_json::Value>,
    refused: HashSet<String>,
}

/// Handle to the running fake relay.
pub struct FakeMailRelay {
    addr: SocketAddr,
    state: Arc<Mutex<RelayState>>,
}

impl FakeMailRelay {
    /// Start the relay on a random port. Returns once the listener is bound.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(RelayState::default()));

        let app = Router::new()
            .route("/send", post(accept_message))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Full URL of the send endpoint (e.g. `http://127.0.0.1:PORT/send`).
    pub fn send_url(&self) -> String {
        format!("http://{}/send", self.addr)
    }

    /// Refuse every message addressed to `address`.
    pub async fn refuse(&self, address: &str) {
        self.state.lock().await.refused.insert(address.to_string());
    }

    /// Messages accepted so far, in arrival order.
    pub async fn inbox(&self) -> Vec<serde_json::Value> {
        self.state.lock().await.inbox.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn accept_message(
    State(state): State<Arc<Mutex<RelayState>>>,
    Json(message): Json<serde_json::Value>,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    let to = message["to"].as_str().unwrap_or_default().to_string();
    if state.refused.contains(&to) {
        return (StatusCode::BAD_GATEWAY, format!("550 mailbox unavailable: {to}"));
    }
    state.inbox.push(message);
    (StatusCode::ACCEPTED, String::new())
}
