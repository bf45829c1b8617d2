//! Remote store port (driven/secondary port)
//!
//! The remote store is the single authoritative source of truth shared by
//! every execution context. The engine only needs snapshot fetches and
//! per-record uploads with a success/failure outcome; transport details
//! (HTTP routes, serialization) belong to the adapter.

use serde::{Deserialize, Serialize};

use crate::domain::booking::Booking;

/// Outcome of a successful upload
///
/// `created` distinguishes a record the remote store accepted as new from
/// one it accepted as a replacement, so callers can emit the matching
/// lifecycle event. `booking` is the record as the remote store accepted
/// it, which becomes the locally tracked copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub booking: Booking,
    pub created: bool,
}

/// Port trait for the remote authoritative bookings store
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Fetches the full remote snapshot
    async fn fetch_all(&self) -> anyhow::Result<Vec<Booking>>;

    /// Uploads one booking, returning the accepted record
    ///
    /// Errors cover both transport faults and remote rejection; the
    /// caller routes failures into the retry queue.
    async fn upload(&self, booking: &Booking) -> anyhow::Result<UploadReceipt>;
}
