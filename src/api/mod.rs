//! REST API module
//!
//! Personal-information endpoints and the client that sends them.

pub mod client;
pub mod endpoint;

pub use client::ApiClient;
pub use endpoint::Endpoint;

use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HAVWTR_API_BASE_URL is not set")]
    NotConfigured,

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response had no body")]
    EmptyBody,

    #[error("Failed to decode response: {0}")]
    Decode(serde_json::Error),
}
