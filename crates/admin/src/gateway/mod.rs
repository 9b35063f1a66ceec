//! Remote data gateway for the vendor REST API.
//!
//! Every response is normalized here. Callers get typed entities and
//! [`Listing`]s and never look at the envelope shape the backend happened to
//! use.
//!
//! # Errors
//!
//! - HTTP 4xx/5xx: [`GatewayError::Status`]
//! - Transport failures: [`GatewayError::Request`]
//! - Undecodable bodies: [`GatewayError::Decode`]
//! - Slow responses: [`GatewayError::Timeout`]
//! - `success: false` envelopes: [`GatewayError::Rejected`]

mod client;
mod endpoints;
mod envelope;
mod resource;

use std::time::Duration;

use thiserror::Error;

pub use client::VendorApiClient;
pub(crate) use endpoints::zone_methods_path;
pub use envelope::Listing;
pub use resource::{Resource, ResourceClient};

/// Errors that can occur when talking to the vendor API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// HTTP request failed before a response arrived.
    #[error("Request failed: {0}")]
    Request(String),

    /// Response body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// No response within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Backend answered with `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl GatewayError {
    /// Whether the failure is on the server or network side rather than a
    /// request the backend refused.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Request(_) | Self::Decode(_) | Self::Timeout(_) => true,
            Self::Rejected(_) => false,
        }
    }
}
