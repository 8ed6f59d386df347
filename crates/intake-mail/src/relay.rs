//! HTTP mail relay transport.
//!
//! Each message is POSTed as a JSON object (`from`, `to`, `subject`, `body`)
//! to the configured relay endpoint. Any 2xx response counts as accepted.
//! The relay is expected on a local or private network, so plain HTTP only.

use crate::{Email, MailError, Mailer};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::CONTENT_TYPE;
use hyper::{Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

/// Mailer that hands messages to an HTTP relay.
#[derive(Clone)]
pub struct RelayMailer {
    endpoint: Uri,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl RelayMailer {
    pub fn new(endpoint: &str) -> Result<Self, MailError> {
        let uri = endpoint
            .parse::<Uri>()
            .map_err(|e| MailError::InvalidRelayUrl {
                url: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        if uri.scheme_str() != Some("http") || uri.host().is_none() {
            return Err(MailError::InvalidRelayUrl {
                url: endpoint.to_string(),
                reason: "expected an absolute http:// URL".to_string(),
            });
        }

        Ok(Self {
            endpoint: uri,
            client: Client::builder(TokioExecutor::new()).build_http(),
        })
    }

    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let payload = serde_json::to_vec(email)?;
        let request = Request::post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                to = %email.to,
                status = status.as_u16(),
                "mail relay accepted message"
            );
            return Ok(());
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).trim().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
