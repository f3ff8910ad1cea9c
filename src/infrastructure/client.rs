//! Assembly of a ready-to-use submitter from configuration.
//!
//! Provides [`SubmitterBuilder`] (via [`DocumentSubmitter::builder`]) and
//! [`ClientSettings`], a serde-deserializable view of the same options.

use crate::application::{
    gate::{GateConfig, GateConfigError, RateGate},
    ports::{DocumentEncoder, TokenProvider, Transport},
    registry::FormatRegistry,
    submitter::DocumentSubmitter,
};
use crate::domain::time_unit::TimeUnit;
use crate::infrastructure::{
    http::{HttpSetupError, HttpTransport},
    json_encoder::JsonDocumentEncoder,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Error returned when building a `DocumentSubmitter` fails.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No request limit was configured
    #[error("request limit must be set")]
    MissingRequestLimit,
    /// Gate configuration validation failed
    #[error("gate configuration error: {0}")]
    Gate(#[from] GateConfigError),
    /// Neither a transport nor an HTTP endpoint was configured
    #[error("no transport configured: set a transport or an HTTP endpoint")]
    MissingTransport,
    /// An HTTP endpoint was configured without a token provider
    #[error("HTTP endpoint configured without a token provider")]
    MissingTokenProvider,
    /// The HTTP transport could not be set up
    #[error(transparent)]
    Http(#[from] HttpSetupError),
}

/// Submitter settings as they appear in configuration files.
///
/// Keys are kebab-case:
///
/// ```
/// use registry_throttle::{ClientSettings, TimeUnit};
///
/// let settings: ClientSettings = serde_json::from_str(r#"{
///     "time-unit": "SECONDS",
///     "request-limit": 5,
///     "base-url": "https://ismp.crpt.ru",
///     "introduce-goods-path": "/api/v3/lk/documents/create"
/// }"#).unwrap();
///
/// assert_eq!(settings.time_unit, TimeUnit::Seconds);
/// assert_eq!(settings.request_limit, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientSettings {
    /// One unit of this is the rolling window
    pub time_unit: TimeUnit,
    /// Maximum submissions started per window
    pub request_limit: usize,
    /// Registry base URL
    pub base_url: String,
    /// Path of the document creation endpoint, relative to `base_url`
    #[serde(alias = "introduce-goods-api")]
    pub introduce_goods_path: String,
    /// Product group stamped on JSON envelopes
    #[serde(default)]
    pub product_group: Option<String>,
    /// HTTP request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Builder for constructing a `DocumentSubmitter`.
pub struct SubmitterBuilder {
    interval: Duration,
    request_limit: Option<usize>,
    encoders: Vec<Arc<dyn DocumentEncoder>>,
    product_group: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    http_endpoint: Option<(String, String)>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    request_timeout: Duration,
}

impl SubmitterBuilder {
    /// Use one `unit` of time as the rolling window.
    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.interval = unit.one();
        self
    }

    /// Set the rolling window length directly.
    ///
    /// The value will be validated when `build()` is called.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the maximum number of submissions started per window.
    ///
    /// The value will be validated when `build()` is called.
    pub fn with_request_limit(mut self, limit: usize) -> Self {
        self.request_limit = Some(limit);
        self
    }

    /// Register an additional encoder.
    ///
    /// Encoders added here take precedence over the built-in JSON encoder,
    /// and earlier registrations take precedence over later ones.
    pub fn with_encoder(mut self, encoder: Arc<dyn DocumentEncoder>) -> Self {
        self.encoders.push(encoder);
        self
    }

    /// Product group stamped by the built-in JSON encoder.
    pub fn with_product_group(mut self, product_group: impl Into<String>) -> Self {
        self.product_group = Some(product_group.into());
        self
    }

    /// Use a custom transport. Overrides any HTTP endpoint.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Deliver over HTTP to `base_url` + `path`.
    ///
    /// Requires a token provider.
    pub fn with_http_endpoint(mut self, base_url: impl Into<String>, path: impl Into<String>) -> Self {
        self.http_endpoint = Some((base_url.into(), path.into()));
        self
    }

    /// Set the token provider used by the HTTP transport.
    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(tokens);
        self
    }

    /// Set the HTTP request timeout.
    ///
    /// Default: 30 seconds
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Apply every option found in `settings`.
    pub fn with_settings(mut self, settings: ClientSettings) -> Self {
        self = self
            .with_time_unit(settings.time_unit)
            .with_request_limit(settings.request_limit)
            .with_http_endpoint(settings.base_url, settings.introduce_goods_path);
        if let Some(group) = settings.product_group {
            self = self.with_product_group(group);
        }
        if let Some(secs) = settings.request_timeout_secs {
            self = self.with_request_timeout(Duration::from_secs(secs));
        }
        self
    }

    /// Build the submitter and start its rate gate.
    ///
    /// # Errors
    /// Returns `BuildError` if the configuration is invalid.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn build(self) -> Result<DocumentSubmitter, BuildError> {
        let limit = self.request_limit.ok_or(BuildError::MissingRequestLimit)?;
        let config = GateConfig::new(self.interval, limit)?;

        let transport: Arc<dyn Transport> = match (self.transport, self.http_endpoint) {
            (Some(transport), _) => transport,
            (None, Some((base_url, path))) => {
                let tokens = self
                    .token_provider
                    .ok_or(BuildError::MissingTokenProvider)?;
                Arc::new(HttpTransport::with_timeout(
                    &base_url,
                    &path,
                    tokens,
                    self.request_timeout,
                )?)
            }
            (None, None) => return Err(BuildError::MissingTransport),
        };

        let mut json = JsonDocumentEncoder::new();
        if let Some(group) = self.product_group {
            json = json.with_product_group(group);
        }
        let mut encoders = self.encoders;
        encoders.push(Arc::new(json));

        let gate = Arc::new(RateGate::new(config));
        Ok(DocumentSubmitter::new(
            gate,
            FormatRegistry::new(encoders),
            transport,
        ))
    }
}

impl DocumentSubmitter {
    /// Create a builder for configuring a submitter.
    ///
    /// Defaults:
    /// - Interval: 1 second
    /// - Request limit: none (must be set)
    /// - Encoders: the JSON encoder for `MANUAL`
    /// - HTTP request timeout: 30 seconds
    pub fn builder() -> SubmitterBuilder {
        SubmitterBuilder {
            interval: TimeUnit::Seconds.one(),
            request_limit: None,
            encoders: Vec::new(),
            product_group: None,
            transport: None,
            http_endpoint: None,
            token_provider: None,
            request_timeout: HttpTransport::DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::EncodeError;
    use crate::domain::{
        envelope::Envelope,
        format::{DocumentFormat, DocumentKind},
    };
    use crate::infrastructure::mocks::RecordingTransport;
    use crate::infrastructure::token::StaticTokenProvider;
    use serde_json::json;

    #[derive(Debug)]
    struct UppercaseManualEncoder;

    impl DocumentEncoder for UppercaseManualEncoder {
        fn format(&self) -> DocumentFormat {
            DocumentFormat::Manual
        }

        fn kind(&self) -> DocumentKind {
            DocumentKind::LpIntroduceGoods
        }

        fn encode(
            &self,
            _document: &serde_json::Value,
            signature: &str,
        ) -> Result<Envelope, EncodeError> {
            Ok(Envelope::new(self.format(), self.kind(), signature, "CUSTOM"))
        }
    }

    fn settings() -> ClientSettings {
        serde_json::from_value(json!({
            "time-unit": "minutes",
            "request-limit": 10,
            "base-url": "https://ismp.crpt.ru",
            "introduce-goods-api": "/api/v3/lk/documents/create",
            "product-group": "clothes",
        }))
        .unwrap()
    }

    #[test]
    fn test_settings_deserialize() {
        let settings = settings();
        assert_eq!(settings.time_unit, TimeUnit::Minutes);
        assert_eq!(settings.request_limit, 10);
        assert_eq!(settings.introduce_goods_path, "/api/v3/lk/documents/create");
        assert_eq!(settings.product_group.as_deref(), Some("clothes"));
        assert_eq!(settings.request_timeout_secs, None);
    }

    #[test]
    fn test_settings_reject_unknown_time_unit() {
        let result: Result<ClientSettings, _> = serde_json::from_value(json!({
            "time-unit": "fortnights",
            "request-limit": 10,
            "base-url": "https://ismp.crpt.ru",
            "introduce-goods-path": "/create",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_request_limit() {
        let result = DocumentSubmitter::builder()
            .with_transport(Arc::new(RecordingTransport::new()))
            .build();
        assert!(matches!(result, Err(BuildError::MissingRequestLimit)));
    }

    #[test]
    fn test_zero_request_limit() {
        let result = DocumentSubmitter::builder()
            .with_request_limit(0)
            .with_transport(Arc::new(RecordingTransport::new()))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::Gate(GateConfigError::ZeroLimit))
        ));
    }

    #[test]
    fn test_zero_interval() {
        let result = DocumentSubmitter::builder()
            .with_interval(Duration::ZERO)
            .with_request_limit(1)
            .with_transport(Arc::new(RecordingTransport::new()))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::Gate(GateConfigError::ZeroInterval))
        ));
    }

    #[test]
    fn test_oversized_interval() {
        let result = DocumentSubmitter::builder()
            .with_interval(Duration::from_secs(u64::MAX))
            .with_request_limit(1)
            .with_transport(Arc::new(RecordingTransport::new()))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::Gate(GateConfigError::IntervalTooLarge { .. }))
        ));
    }

    #[test]
    fn test_missing_transport() {
        let result = DocumentSubmitter::builder().with_request_limit(1).build();
        assert!(matches!(result, Err(BuildError::MissingTransport)));
    }

    #[test]
    fn test_http_endpoint_requires_tokens() {
        let result = DocumentSubmitter::builder()
            .with_request_limit(1)
            .with_http_endpoint("https://ismp.crpt.ru", "/create")
            .build();
        assert!(matches!(result, Err(BuildError::MissingTokenProvider)));
    }

    #[test]
    fn test_invalid_http_endpoint() {
        let result = DocumentSubmitter::builder()
            .with_request_limit(1)
            .with_http_endpoint("::not-a-url::", "/create")
            .with_token_provider(Arc::new(StaticTokenProvider::new("t")))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::Http(HttpSetupError::InvalidEndpoint { .. }))
        ));
    }

    #[tokio::test]
    async fn test_build_from_settings() {
        let submitter = DocumentSubmitter::builder()
            .with_settings(settings())
            .with_token_provider(Arc::new(StaticTokenProvider::new("t")))
            .build()
            .unwrap();

        let config = submitter.gate().config();
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.limit(), 10);
        assert_eq!(submitter.registry().formats(), vec![DocumentFormat::Manual]);

        let envelope = submitter
            .registry()
            .resolve(DocumentFormat::Manual)
            .unwrap()
            .encode(&json!({}), "sig")
            .unwrap();
        assert_eq!(envelope.product_group(), Some("clothes"));

        submitter.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_encoder_takes_precedence() {
        let transport = RecordingTransport::new();
        let submitter = DocumentSubmitter::builder()
            .with_request_limit(5)
            .with_encoder(Arc::new(UppercaseManualEncoder))
            .with_transport(Arc::new(transport.clone()))
            .build()
            .unwrap();

        submitter
            .submit(&json!({"a": 1}), "sig", DocumentFormat::Manual)
            .await
            .unwrap();

        assert_eq!(transport.sent()[0].encoded_payload(), "CUSTOM");
    }
}
