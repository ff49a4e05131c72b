//! Storefront REST client.
//!
//! One [`StorefrontApi`] instance talks to every endpoint the storefront
//! exposes: the product catalog, promotion-code resolution, the server-side
//! cart, and orders. Requests carry the shopper's opaque session cookie when
//! one is configured.

use reqwest::{Client, RequestBuilder, Response, header};
use thiserror::Error;

use tuckshop::pricing::PricingError;

pub mod carts;
pub mod discounts;
pub mod orders;
pub mod products;

/// Configuration for connecting to the storefront API.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// API base URL, e.g. `"https://shop.example.com/api"`.
    pub base_url: String,

    /// Session cookie value; requests go out anonymous when absent.
    pub session: Option<String>,
}

/// HTTP client for the storefront API.
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    config: StorefrontConfig,
    http: Client,
}

impl StorefrontApi {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.with_session(self.http.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.with_session(self.http.post(self.url(path)))
    }

    fn patch(&self, path: &str) -> RequestBuilder {
        self.with_session(self.http.patch(self.url(path)))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.with_session(self.http.delete(self.url(path)))
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.session {
            Some(session) => request.header(header::COOKIE, format!("session={session}")),
            None => request,
        }
    }

    /// Surface a non-2xx response as an `UnexpectedResponse` carrying the
    /// status and body.
    async fn error_for_status(context: &str, response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        Err(ApiError::UnexpectedResponse(format!(
            "{context} request failed with status {status}: {text}"
        )))
    }
}

/// Errors that can occur when communicating with the storefront.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storefront returned a non-2xx response or unexpected body.
    #[error("unexpected response from storefront: {0}")]
    UnexpectedResponse(String),

    /// A monetary amount in a response was not representable.
    #[error("invalid amount in response")]
    InvalidAmount(#[source] PricingError),
}
