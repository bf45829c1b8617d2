//! Bookings API HTTP client
//!
//! Typed client for the property-management bookings API. The engine only
//! needs two operations from the remote side: fetch the full snapshot and
//! upload a single record; routes and status-code mapping live here.
//!
//! Requests carry a bounded timeout so a partial network partition (slow
//! but not failing) surfaces as a failure the retry queue can handle
//! instead of hanging a reconciliation pass.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use staysync_api::client::HttpRemoteStore;
//!
//! # fn example() -> anyhow::Result<()> {
//! let store = HttpRemoteStore::new("https://pm.example.com", Duration::from_secs(10))?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use staysync_core::domain::booking::Booking;
use staysync_core::ports::remote_store::{IRemoteStore, UploadReceipt};

use crate::ApiError;

/// HTTP adapter for the bookings API
///
/// Routes:
/// - `GET  {base}/api/bookings` - full snapshot
/// - `PUT  {base}/api/bookings/{id}` - upsert one record
///   (201 when the API created it, 200 when it replaced an existing one)
/// - `GET  {base}/api/health` - liveness probe
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// Creates a client for the given API base URL
    ///
    /// # Arguments
    /// * `base_url` - e.g. `https://pm.example.com` (no trailing slash needed)
    /// * `timeout` - per-request bound, covering connect and body transfer
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    /// The configured base URL (useful for diagnostics)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes the API's health endpoint
    ///
    /// Used by connectivity drivers: any 2xx means reachable, everything
    /// else (including timeouts) means offline.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(error = %err, "Health probe failed");
                false
            }
        }
    }

    async fn fetch_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let url = format!("{}/api/bookings", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_error(status, response.text().await.unwrap_or_default()));
        }

        let bookings: Vec<Booking> = response
            .json()
            .await
            .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
        debug!(bookings = bookings.len(), "Fetched remote snapshot");
        Ok(bookings)
    }

    async fn put_booking(&self, booking: &Booking) -> Result<UploadReceipt, ApiError> {
        let url = format!("{}/api/bookings/{}", self.base_url, booking.id());
        let response = self.client.put(&url).json(booking).send().await?;

        let status = response.status();
        match status {
            StatusCode::OK | StatusCode::CREATED => {
                let accepted: Booking = response
                    .json()
                    .await
                    .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
                debug!(
                    id = %accepted.id(),
                    created = status == StatusCode::CREATED,
                    "Booking accepted by API"
                );
                Ok(UploadReceipt {
                    booking: accepted,
                    created: status == StatusCode::CREATED,
                })
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                warn!(id = %booking.id(), %status, "API rejected booking upload");
                Err(map_error(status, body))
            }
        }
    }
}

#[async_trait::async_trait]
impl IRemoteStore for HttpRemoteStore {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Booking>> {
        Ok(self.fetch_bookings().await?)
    }

    async fn upload(&self, booking: &Booking) -> anyhow::Result<UploadReceipt> {
        Ok(self.put_booking(booking).await?)
    }
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

fn map_error(status: StatusCode, body: String) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound(body),
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => ApiError::Rejected(body),
        s if s.is_server_error() => ApiError::ServerError(body),
        _ => ApiError::UnexpectedStatus { status, body },
    }
}
