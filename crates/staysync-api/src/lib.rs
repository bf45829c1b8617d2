//! StaySync API - Bookings API client
//!
//! Async HTTP adapter implementing the
//! [`IRemoteStore`](staysync_core::ports::remote_store::IRemoteStore) port
//! against the property-management bookings API (JSON over HTTP).
//!
//! ## Modules
//!
//! - [`client`] - The [`HttpRemoteStore`](client::HttpRemoteStore) adapter

pub mod client;

use thiserror::Error;

/// Errors that can occur when communicating with the bookings API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API rejected the record (validation failure)
    #[error("Rejected: {0}")]
    Rejected(String),

    /// A server-side error occurred (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error occurred (including the request timeout)
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The response body could not be decoded
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// Any other unexpected status code
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },
}
