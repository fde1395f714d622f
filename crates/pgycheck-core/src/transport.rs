use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use thiserror::Error;

use crate::request::CheckRequest;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// What came back from the wire for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    /// `None` when the response carried no payload.
    pub body: Option<Vec<u8>>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status,
            body: (!body.is_empty()).then_some(body),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0}")]
    Other(String),
}

/// Issues one check request and reports the raw outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &CheckRequest) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the default request and connect timeouts.
    ///
    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeouts(DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn with_timeouts(
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(format!("pgycheck/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransportError::ClientBuild)?;
        Ok(Self { client })
    }

    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// The form `POST` sent for `request`.
    fn build(&self, request: &CheckRequest) -> Result<reqwest::Request, TransportError> {
        self.client
            .post(request.url.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .body(request.body.clone())
            .build()
            .map_err(|error| Self::map_error(request.url.as_str(), error))
    }

    fn map_error(url: &str, source: reqwest::Error) -> TransportError {
        if source.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                source,
            }
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &CheckRequest) -> Result<RawResponse, TransportError> {
        let url = request.url.as_str();

        let response = self
            .client
            .execute(self.build(request)?)
            .await
            .map_err(|error| Self::map_error(url, error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| Self::map_error(url, error))?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
