//! Outbound HTTP seam.
//!
//! The submitter never talks to the network directly. It hands a serialised body to a
//! [`Transport`], which performs one POST and reports the raw status and body. Timeouts,
//! TLS and connection pooling are transport policy and live in [`HttpTransport`]; tests
//! substitute an in-memory transport.

use crate::config::CoreConfig;
use crate::constants::{CONNECT_TIMEOUT_SECS, SUBMISSION_CONTENT_TYPE};
use crate::error::{RegistrationError, RegistrationResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;

/// Raw result of a completed HTTP exchange, whatever its status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The exchange did not produce a readable response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("cannot connect to {0}")]
    Connect(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Performs one POST of a JSON document.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &Url, body: String)
        -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn post_json(
        &self,
        url: &Url,
        body: String,
    ) -> Result<TransportResponse, TransportError> {
        (**self).post_json(url, body).await
    }
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a client with the configured request timeout.
    pub fn new(cfg: &CoreConfig) -> RegistrationResult<Self> {
        let client = Client::builder()
            .timeout(cfg.request_timeout())
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(RegistrationError::HttpClient)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &Url,
        body: String,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, SUBMISSION_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(e, url))?;

        Ok(TransportResponse { status, body })
    }
}

fn classify(err: reqwest::Error, url: &Url) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(url.to_string())
    } else {
        TransportError::Http(err)
    }
}
