//! HTTP transport delivering envelopes to the registry.

use crate::application::ports::{TokenProvider, Transport, TransportError};
use crate::domain::envelope::{Envelope, SubmissionResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Error returned when an HTTP transport cannot be set up.
#[derive(Debug, thiserror::Error)]
pub enum HttpSetupError {
    /// Base URL and path do not form a valid URL
    #[error("invalid registry endpoint `{url}`: {source}")]
    InvalidEndpoint {
        /// The URL that failed to parse
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Join a base URL and a path the way a client with a base URL does:
/// by concatenation, with exactly one slash between them.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url, HttpSetupError> {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let url = if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    };

    Url::parse(&url).map_err(|source| HttpSetupError::InvalidEndpoint { url, source })
}

/// Transport that POSTs each envelope as JSON with a bearer token.
///
/// A token is fetched from the provider for every request. Non-success
/// statuses are reported as `TransportError::Status`; success bodies are
/// decoded leniently into a [`SubmissionResponse`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpTransport {
    /// Request timeout used by [`HttpTransport::new`].
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a transport for `base_url` + `path` with the default timeout.
    ///
    /// # Errors
    /// Returns `HttpSetupError` if the endpoint is not a valid URL or the
    /// client cannot be built.
    pub fn new(
        base_url: &str,
        path: &str,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, HttpSetupError> {
        Self::with_timeout(base_url, path, tokens, Self::DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom request timeout.
    ///
    /// # Errors
    /// Same as [`HttpTransport::new`].
    pub fn with_timeout(
        base_url: &str,
        path: &str,
        tokens: Arc<dyn TokenProvider>,
        timeout: Duration,
    ) -> Result<Self, HttpSetupError> {
        let endpoint = endpoint_url(base_url, path)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpSetupError::Client)?;

        Ok(Self::with_client(client, endpoint, tokens))
    }

    /// Create a transport around an existing client.
    pub fn with_client(
        client: reqwest::Client,
        endpoint: Url,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            endpoint,
            tokens,
        }
    }

    /// Full URL envelopes are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, envelope: &Envelope) -> Result<SubmissionResponse, TransportError> {
        let token = self.tokens.token().await?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(token.as_str())
            .json(envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            endpoint = %self.endpoint,
            status = status.as_u16(),
            "registry responded"
        );

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(TransportError::Decode)
    }
}
