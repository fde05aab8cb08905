//! HTTP client for the remote cart service.
//!
//! Wraps `reqwest` with timeout/user-agent construction and one method per
//! cart operation. Responses are returned as raw `serde_json::Value`s: the
//! service's envelopes vary too much for typed deserialization, and the
//! interpretation (success flags, error messages, line normalization) lives
//! in `cartwheel-core` where it is unit-testable against fixtures.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use crate::error::RemoteError;
use crate::types::{AddItemRequest, RemoveItemRequest, UpdateItemRequest};

/// Client for the remote cart service.
///
/// Use [`CartClient::new`] in production; point `base_url` at a mock server
/// in tests.
pub struct CartClient {
    client: Client,
    base_url: Url,
}

impl CartClient {
    /// Creates a client for the cart service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RemoteError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Ensure exactly one trailing slash so Url::join appends path
        // segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| RemoteError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the server-authoritative cart.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::Http`] on network failure or non-2xx HTTP status.
    /// - [`RemoteError::Deserialize`] if the body is not valid JSON.
    pub async fn get_cart(&self) -> Result<Value, RemoteError> {
        let url = self.endpoint("cart");
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Adds an item to the remote cart.
    ///
    /// The response envelope signals business-rule rejections (e.g. the
    /// single-store-per-cart constraint) via its `success` field; this method
    /// only fails on transport or parse errors.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::Http`] on network failure or non-2xx HTTP status.
    /// - [`RemoteError::Deserialize`] if the body is not valid JSON.
    pub async fn add_item(&self, request: &AddItemRequest) -> Result<Value, RemoteError> {
        self.post_json("cart/add", request).await
    }

    /// Removes a line from the remote cart by its line key.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::Http`] on network failure or non-2xx HTTP status.
    /// - [`RemoteError::Deserialize`] if the body is not valid JSON.
    pub async fn remove_item(&self, key: &str) -> Result<Value, RemoteError> {
        let request = RemoveItemRequest {
            key: key.to_owned(),
        };
        self.post_json("cart/remove", &request).await
    }

    /// Replaces the quantity of a remote cart line.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::Http`] on network failure or non-2xx HTTP status.
    /// - [`RemoteError::Deserialize`] if the body is not valid JSON.
    pub async fn update_item(&self, key: &str, quantity: u32) -> Result<Value, RemoteError> {
        let request = UpdateItemRequest {
            key: key.to_owned(),
            quantity,
        };
        self.post_json("cart/update", &request).await
    }

    /// Empties the remote cart. Best-effort from the caller's perspective.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::Http`] on network failure or non-2xx HTTP status.
    /// - [`RemoteError::Deserialize`] if the body is not valid JSON.
    pub async fn empty_cart(&self) -> Result<Value, RemoteError> {
        self.post_json("cart/empty", &serde_json::json!({})).await
    }

    fn endpoint(&self, path: &str) -> Url {
        // base_url always ends in '/' and path is a known relative literal,
        // so join cannot fail.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, RemoteError> {
        let url = self.endpoint(path);
        let response = self.client.post(url.clone()).json(body).send().await?;
        let response = response.error_for_status()?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| RemoteError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
