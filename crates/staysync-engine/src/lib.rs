//! StaySync Engine - Booking reconciliation engine
//!
//! Keeps a locally cached set of booking records consistent with the
//! remote authoritative store across unreliable connectivity, concurrent
//! local mutation, and multiple peer execution contexts.
//!
//! ## Modules
//!
//! - [`engine`] - The [`SyncEngine`](engine::SyncEngine) orchestrator
//! - [`queue`] - FIFO upload queue with bounded retry
//! - [`bus`] - In-process event fan-out plus cross-context hints
//! - [`monitor`] - Connectivity monitor adapters
//! - [`scheduler`] - Periodic/reactive trigger loop
//!
//! No error crosses the public engine surface: operations resolve to a
//! boolean, a status snapshot, or emitted events.

pub mod bus;
pub mod engine;
pub mod monitor;
pub mod queue;
pub mod scheduler;

use thiserror::Error;

/// Errors that abort a reconciliation pass
///
/// Internal to the engine: passes log these and retry on the next
/// scheduled cycle rather than surfacing them to callers.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local snapshot could not be read or written; the pass aborts
    /// with no partial mutation
    #[error("local store unavailable: {0}")]
    LocalStore(#[source] anyhow::Error),

    /// The remote snapshot could not be fetched
    #[error("remote store unavailable: {0}")]
    RemoteStore(#[source] anyhow::Error),

    /// The engine is offline; reconciliation waits for a transition
    #[error("engine is offline")]
    Offline,
}
