pub mod client;
pub mod error;
pub mod types;

pub use client::CartClient;
pub use error::RemoteError;
pub use types::AddItemRequest;
