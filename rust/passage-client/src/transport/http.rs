//! HTTP transport backed by `reqwest`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use url::Url;

use super::{Transport, TransportError, TransportResponse};

/// Configuration for [`HttpTransport`]
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Origin that request paths are resolved against
    /// (e.g. "https://example.com")
    pub origin: String,

    /// Optional timeout for requests in seconds (default: 30). Only applied on
    /// native targets; in a browser, `fetch` has no timeout of its own.
    pub timeout_seconds: Option<u64>,

    /// Optional custom headers to send with each request
    pub headers: Vec<(String, String)>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            timeout_seconds: Some(30),
            headers: Vec::new(),
        }
    }
}

impl HttpTransportConfig {
    /// Create a new HTTP transport configuration
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// Talks to the relying party over HTTP.
///
/// Cookies set by the relying party are kept and replayed: on native targets
/// through `reqwest`'s cookie store, in a browser through
/// `credentials: "include"`.
///
/// # Examples
///
/// ```no_run
/// use passage_client::{HttpTransport, HttpTransportConfig, Transport};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new(
///     HttpTransportConfig::new("https://example.com").with_timeout(60),
/// )?;
///
/// let response = transport
///     .post_json("/webauthn/login", &json!({ "username": "alice" }))
///     .await?;
/// assert_eq!(response.status(), 200);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HttpTransport {
    config: HttpTransportConfig,
    origin: Url,
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration
    ///
    /// Fails when the origin is not an absolute URL or the underlying client
    /// cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let origin =
            Url::parse(&config.origin).map_err(|error| TransportError::InvalidOrigin {
                origin: config.origin.clone(),
                reason: error.to_string(),
            })?;

        #[allow(unused_mut)]
        let mut client_builder = Client::builder();

        #[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
        {
            client_builder = client_builder.cookie_store(true);

            if let Some(timeout) = config.timeout_seconds {
                client_builder = client_builder.timeout(std::time::Duration::from_secs(timeout));
            }
        }

        let client = client_builder
            .build()
            .map_err(|error| TransportError::ClientSetup {
                reason: error.to_string(),
            })?;

        Ok(Self {
            config,
            origin,
            client,
        })
    }

    /// The configuration this transport was created with
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    /// Resolve a path against the configured origin
    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        self.origin
            .join(path)
            .map_err(|error| TransportError::InvalidUrl {
                path: path.to_string(),
                reason: error.to_string(),
            })
    }

    /// Add credentials and custom headers to a request
    fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        let mut builder = builder;

        #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
        {
            builder = builder.fetch_credentials_include();
        }

        for (key, value) in &self.config.headers {
            builder = builder.header(key, value);
        }

        builder
    }

    async fn send(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<TransportResponse, TransportError> {
        let failed = |error: reqwest::Error| TransportError::RequestFailed {
            path: path.to_string(),
            reason: format!("HTTP request failed: {}", error),
        };

        let response = request.send().await.map_err(failed)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(failed)?;

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(path)?;
        let request = self.build_request(self.client.post(url).json(body));
        self.send(path, request).await
    }

    async fn get(&self, path: &str) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(path)?;
        let request = self.build_request(self.client.get(url));
        self.send(path, request).await
    }
}
