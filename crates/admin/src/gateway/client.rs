//! HTTP transport for the vendor REST API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;

use super::GatewayError;
use super::envelope::{self, Listing};
use crate::config::ConsoleConfig;

/// Vendor REST API client.
///
/// Cheap to clone; clones share one connection pool. Every request carries
/// the vendor's bearer token and is bounded by the configured timeout.
#[derive(Clone)]
pub struct VendorApiClient {
    inner: Arc<VendorApiClientInner>,
}

struct VendorApiClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash
    base_url: String,
    timeout: Duration,
}

impl VendorApiClient {
    /// Create a new vendor API client.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Request` if the token is not a valid header
    /// value or the HTTP client fails to build.
    pub fn new(config: &ConsoleConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        let mut auth = HeaderValue::from_str(&auth_value)
            .map_err(|e| GatewayError::Request(format!("Invalid API token format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(VendorApiClientInner {
                client,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                timeout: config.request_timeout,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Upper bound applied to every request.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.inner.timeout
    }

    // =========================================================================
    // Envelope-aware helpers
    // =========================================================================

    /// GET a list endpoint and normalize the envelope.
    pub(crate) async fn fetch_list<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Listing<T>, GatewayError> {
        let body = self.execute_json(Method::GET, path, None::<&()>).await?;
        envelope::list(body)
    }

    /// Send a request that answers with a single entity.
    pub(crate) async fn fetch_entity<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.execute_json(method, path, body).await?;
        envelope::entity(body)
    }

    /// Send a request whose response carries only a success flag.
    pub(crate) async fn acknowledge<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), GatewayError> {
        let text = self.execute(method, path, body).await?;
        envelope::acknowledgement(&text)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn execute_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, GatewayError> {
        let text = self.execute(method, path, body).await?;
        if text.trim().is_empty() {
            return Err(GatewayError::Decode("empty response body".to_string()));
        }
        serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Send a request and return the body of a successful response.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, GatewayError> {
        let url = format!("{}{path}", self.inner.base_url);
        let mut request = self.inner.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            let err = self.transport_error(&e);
            tracing::error!(%method, path, error = %err, "Vendor API request failed");
            err
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if status.is_success() {
            tracing::debug!(%method, path, status = status.as_u16(), "Vendor API request");
            return Ok(text);
        }

        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .as_ref()
            .and_then(envelope::envelope_message)
            .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        tracing::error!(
            %method,
            path,
            status = status.as_u16(),
            message = %message,
            "Vendor API error"
        );

        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn transport_error(&self, e: &reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout(self.inner.timeout)
        } else {
            GatewayError::Request(e.to_string())
        }
    }
}

impl std::fmt::Debug for VendorApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorApiClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}
