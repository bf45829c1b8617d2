//! Local store port (driven/secondary port)
//!
//! The local store holds the client's cached booking snapshot. Its backing
//! format (JSON file, keyed browser storage, in-memory vector) is
//! irrelevant to the engine: reads and writes move the whole snapshot, and
//! a write replaces it atomically so an aborted reconciliation pass never
//! leaves a partially mutated cache behind.

use crate::domain::booking::Booking;

/// Port trait for the locally cached booking snapshot
///
/// Uses `anyhow::Result` because failures at this boundary are
/// adapter-specific (I/O, corrupt file) and need no domain classification.
/// A failed read or write aborts the current reconciliation pass; the next
/// scheduled pass retries from scratch.
#[async_trait::async_trait]
pub trait ILocalStore: Send + Sync {
    /// Reads the full local snapshot
    async fn read(&self) -> anyhow::Result<Vec<Booking>>;

    /// Replaces the full local snapshot
    ///
    /// Implementations must be all-or-nothing: on error the previous
    /// snapshot stays readable.
    async fn write(&self, bookings: &[Booking]) -> anyhow::Result<()>;
}
