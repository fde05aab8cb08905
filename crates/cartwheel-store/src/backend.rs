//! Remote service seam for the cart store.
//!
//! The store talks to the cart service through [`CartBackend`] so tests can
//! script responses without a network. The production implementation simply
//! forwards to [`cartwheel_remote::CartClient`].

use cartwheel_remote::types::AddItemRequest;
use cartwheel_remote::{CartClient, RemoteError};
use serde_json::Value;
use thiserror::Error;

/// Transport-level failure from the remote seam. The store never inspects
/// these beyond their message: any backend error rolls the mutation back.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl From<RemoteError> for BackendError {
    fn from(err: RemoteError) -> Self {
        Self(err.to_string())
    }
}

/// The five remote cart operations the store depends on.
///
/// All responses are raw JSON values; envelope interpretation happens in
/// `cartwheel_core::response` and `cartwheel_core::normalize`.
#[allow(async_fn_in_trait)]
pub trait CartBackend {
    async fn fetch_cart(&self) -> Result<Value, BackendError>;
    async fn add_item(&self, request: &AddItemRequest) -> Result<Value, BackendError>;
    async fn remove_item(&self, key: &str) -> Result<Value, BackendError>;
    async fn update_item(&self, key: &str, quantity: u32) -> Result<Value, BackendError>;
    async fn empty_cart(&self) -> Result<Value, BackendError>;
}

impl CartBackend for CartClient {
    async fn fetch_cart(&self) -> Result<Value, BackendError> {
        Ok(CartClient::get_cart(self).await?)
    }

    async fn add_item(&self, request: &AddItemRequest) -> Result<Value, BackendError> {
        Ok(CartClient::add_item(self, request).await?)
    }

    async fn remove_item(&self, key: &str) -> Result<Value, BackendError> {
        Ok(CartClient::remove_item(self, key).await?)
    }

    async fn update_item(&self, key: &str, quantity: u32) -> Result<Value, BackendError> {
        Ok(CartClient::update_item(self, key, quantity).await?)
    }

    async fn empty_cart(&self) -> Result<Value, BackendError> {
        Ok(CartClient::empty_cart(self).await?)
    }
}
