//! Booking reconciliation engine
//!
//! The [`SyncEngine`] composes the connectivity monitor, difference
//! analyzer, conflict resolver, sync queue, and event bus into one
//! orchestrator. It is triggered by local mutations ([`SyncEngine::sync_booking`]),
//! by the periodic scheduler, by connectivity transitions, and by
//! cross-context broadcast hints; each trigger drives a reconciliation
//! pass over the full booking set.
//!
//! ## Reconciliation pass
//!
//! 1. Fetch the remote snapshot, read the local snapshot
//! 2. Analyze differences (ascending id, watched fields only)
//! 3. Route each difference: upload, download, or resolve
//! 4. Write the merged local snapshot once, then publish download events
//! 5. Update `last_sync_time`
//!
//! Passes never overlap: a reentrancy guard makes a `force_sync` issued
//! while another pass is in flight return immediately. A local store
//! failure aborts the pass with no partial mutation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use staysync_core::config::SyncConfig;
use staysync_core::domain::booking::Booking;
use staysync_core::domain::diff::Difference;
use staysync_core::domain::event::{EventSource, SyncEvent, SyncEventKind};
use staysync_core::ports::broadcast::IPeerChannel;
use staysync_core::ports::connectivity::IConnectivityMonitor;
use staysync_core::ports::local_store::ILocalStore;
use staysync_core::ports::remote_store::IRemoteStore;
use staysync_reconcile::{ConflictResolver, DifferenceAnalyzer, Resolution};

use crate::bus::EventBus;
use crate::queue::SyncQueue;
use crate::SyncError;

/// Read-only snapshot of the engine's state
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatus {
    pub is_online: bool,
    pub queue_length: usize,
    pub last_sync_time: Option<DateTime<Utc>>,
    /// Sum of upload attempts accumulated by currently queued bookings
    pub retry_count: u32,
}

/// Counts of operations applied by one reconciliation pass
#[derive(Debug, Clone, Copy, Default)]
struct PassSummary {
    uploaded: u32,
    downloaded: u32,
    resolved: u32,
    queued: u32,
}

impl PassSummary {
    /// Operations that completed (uploads, downloads, resolutions)
    fn applied(&self) -> u32 {
        self.uploaded + self.downloaded + self.resolved
    }
}

/// Orchestrates reconciliation between the local cache and the remote store
///
/// Dependencies are injected, so tests and embedders construct engines
/// against in-memory stores without shared global state. One engine
/// instance serves one execution context; peers coordinate only through
/// the remote store and the cross-context broadcast hint.
pub struct SyncEngine {
    local: Arc<dyn ILocalStore>,
    remote: Arc<dyn IRemoteStore>,
    connectivity: Arc<dyn IConnectivityMonitor>,
    bus: EventBus,
    queue: SyncQueue,
    /// Held for the duration of a pass; `try_lock` is the reentrancy guard
    pass_guard: Mutex<()>,
    last_sync: RwLock<Option<DateTime<Utc>>>,
    shutdown: CancellationToken,
    interval: Duration,
}

impl SyncEngine {
    /// Creates an engine from its collaborators
    ///
    /// `peer` is the outbound cross-context channel; pass `None` for
    /// single-context embeddings and tests.
    pub fn new(
        local: Arc<dyn ILocalStore>,
        remote: Arc<dyn IRemoteStore>,
        connectivity: Arc<dyn IConnectivityMonitor>,
        peer: Option<Arc<dyn IPeerChannel>>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            local,
            remote,
            connectivity,
            bus: EventBus::new(config.event_capacity, peer),
            queue: SyncQueue::new(config.max_upload_attempts),
            pass_guard: Mutex::new(()),
            last_sync: RwLock::new(None),
            shutdown: CancellationToken::new(),
            interval: config.interval(),
        }
    }

    /// Subscribes to lifecycle events; dropping the receiver unsubscribes
    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.bus.subscribe()
    }

    /// Current online/offline state
    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Token that fires when [`destroy`](SyncEngine::destroy) is called
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stops scheduling of new work
    ///
    /// Cancels the scheduler loop, which drops its timer and channel
    /// subscriptions. In-flight network operations run to completion.
    pub fn destroy(&self) {
        info!("Sync engine shutting down");
        self.shutdown.cancel();
    }

    pub(crate) fn connectivity(&self) -> &Arc<dyn IConnectivityMonitor> {
        &self.connectivity
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) async fn queue_is_empty(&self) -> bool {
        self.queue.is_empty().await
    }

    /// Pushes one locally mutated booking toward the remote store
    ///
    /// Online: uploads immediately, emitting the receipt-appropriate
    /// event, and returns whether the upload succeeded (a failure leaves
    /// the booking queued for retry). Offline: queues the booking and
    /// returns `false`.
    #[tracing::instrument(skip(self, booking), fields(id = %booking.id()))]
    pub async fn sync_booking(&self, booking: Booking) -> bool {
        if !self.connectivity.is_online() {
            debug!("Offline, queueing booking for later upload");
            self.queue.enqueue(booking).await;
            return false;
        }

        match self.remote.upload(&booking).await {
            Ok(receipt) => {
                let kind = if receipt.created {
                    SyncEventKind::BookingCreated
                } else {
                    SyncEventKind::BookingUpdated
                };
                self.bus
                    .publish(SyncEvent::record(kind, receipt.booking, EventSource::Local))
                    .await;
                true
            }
            Err(err) => {
                warn!(error = %err, "Immediate upload failed, queueing for retry");
                self.queue.enqueue(booking).await;
                false
            }
        }
    }

    /// Runs one full reconciliation pass
    ///
    /// Returns without doing anything if a pass is already in flight or
    /// the engine is offline. Store failures abort the pass; the next
    /// trigger retries from scratch.
    #[tracing::instrument(skip(self))]
    pub async fn force_sync(&self) {
        let Ok(_guard) = self.pass_guard.try_lock() else {
            debug!("Reconciliation pass already in flight, skipping");
            return;
        };

        match self.run_pass().await {
            Ok(summary) => {
                debug!(
                    uploaded = summary.uploaded,
                    downloaded = summary.downloaded,
                    resolved = summary.resolved,
                    queued = summary.queued,
                    "Reconciliation pass completed"
                );
            }
            Err(SyncError::Offline) => {
                debug!("Skipping reconciliation while offline");
            }
            Err(err) => {
                warn!(error = %err, "Reconciliation pass aborted");
            }
        }
    }

    /// Attempts to upload every queued booking once
    ///
    /// Invoked by the scheduler after online transitions and on the
    /// periodic tick while online and non-empty.
    pub async fn drain_queue(&self) {
        if !self.connectivity.is_online() {
            debug!("Offline, queue drain deferred");
            return;
        }
        if self.queue.is_empty().await {
            return;
        }
        self.queue.drain(self.remote.as_ref(), &self.bus).await;
    }

    /// Read-only status snapshot; no side effects
    pub async fn status(&self) -> SyncStatus {
        SyncStatus {
            is_online: self.connectivity.is_online(),
            queue_length: self.queue.len().await,
            last_sync_time: *self.last_sync.read().await,
            retry_count: self.queue.total_attempts().await,
        }
    }

    // ========================================================================
    // Reconciliation pass internals
    // ========================================================================

    async fn run_pass(&self) -> Result<PassSummary, SyncError> {
        if !self.connectivity.is_online() {
            return Err(SyncError::Offline);
        }

        let remote_snapshot = self
            .remote
            .fetch_all()
            .await
            .map_err(SyncError::RemoteStore)?;
        let local_snapshot = self.local.read().await.map_err(SyncError::LocalStore)?;

        let report = DifferenceAnalyzer::analyze(&local_snapshot, &remote_snapshot);

        if report.has_malformed() {
            self.bus
                .publish(SyncEvent::diagnostic(format!(
                    "excluded {} local and {} remote records without a usable id",
                    report.malformed_local, report.malformed_remote
                )))
                .await;
        }

        if report.is_clean() {
            debug!("Snapshots agree, nothing to reconcile");
            *self.last_sync.write().await = Some(Utc::now());
            return Ok(PassSummary::default());
        }

        info!(differences = report.differences.len(), "Reconciling snapshots");

        // The merged view starts from the valid local records; every
        // difference rewrites its own entry. One write at the end keeps
        // the local store free of partial mutation.
        let mut merged: BTreeMap<String, Booking> = local_snapshot
            .iter()
            .filter(|b| !b.has_blank_id())
            .map(|b| (b.id().as_str().to_string(), b.clone()))
            .collect();

        // Download-side events wait until the local write succeeds;
        // upload events fire as soon as the remote store accepted them.
        let mut deferred: Vec<SyncEvent> = Vec::new();
        let mut summary = PassSummary::default();

        for difference in report.differences {
            match difference {
                Difference::MissingRemote { local } => {
                    self.push_missing(local, &mut merged, &mut summary).await;
                }
                Difference::MissingLocal { remote } => {
                    merged.insert(remote.id().as_str().to_string(), remote.clone());
                    deferred.push(SyncEvent::record(
                        SyncEventKind::BookingCreated,
                        remote,
                        EventSource::Remote,
                    ));
                    summary.downloaded += 1;
                }
                Difference::Conflict { local, remote } => {
                    self.resolve_conflict(local, remote, &mut merged, &mut deferred, &mut summary)
                        .await;
                }
            }
        }

        if summary.applied() > 0 {
            let next: Vec<Booking> = merged.into_values().collect();
            self.local
                .write(&next)
                .await
                .map_err(SyncError::LocalStore)?;

            for event in deferred {
                self.bus.publish(event).await;
            }
            self.bus.publish(SyncEvent::engine(SyncEventKind::SyncCompleted)).await;
        }

        *self.last_sync.write().await = Some(Utc::now());
        Ok(summary)
    }

    /// Uploads a booking missing from the remote snapshot
    async fn push_missing(
        &self,
        local: Booking,
        merged: &mut BTreeMap<String, Booking>,
        summary: &mut PassSummary,
    ) {
        match self.remote.upload(&local).await {
            Ok(receipt) => {
                let kind = if receipt.created {
                    SyncEventKind::BookingCreated
                } else {
                    SyncEventKind::BookingUpdated
                };
                merged.insert(
                    receipt.booking.id().as_str().to_string(),
                    receipt.booking.clone(),
                );
                self.bus
                    .publish(SyncEvent::record(kind, receipt.booking, EventSource::Local))
                    .await;
                summary.uploaded += 1;
            }
            Err(err) => {
                warn!(id = %local.id(), error = %err, "Upload failed during pass, queueing");
                self.queue.enqueue(local).await;
                summary.queued += 1;
            }
        }
    }

    /// Routes one conflicting pair through the resolution policy
    async fn resolve_conflict(
        &self,
        local: Booking,
        remote: Booking,
        merged: &mut BTreeMap<String, Booking>,
        deferred: &mut Vec<SyncEvent>,
        summary: &mut PassSummary,
    ) {
        match ConflictResolver::resolve(&local, &remote, Utc::now()) {
            Resolution::UseLocal => match self.remote.upload(&local).await {
                Ok(receipt) => {
                    merged.insert(
                        receipt.booking.id().as_str().to_string(),
                        receipt.booking.clone(),
                    );
                    self.bus
                        .publish(SyncEvent::record(
                            SyncEventKind::BookingUpdated,
                            receipt.booking,
                            EventSource::Local,
                        ))
                        .await;
                    summary.resolved += 1;
                }
                Err(err) => {
                    warn!(id = %local.id(), error = %err, "Winning local upload failed, queueing");
                    self.queue.enqueue(local).await;
                    summary.queued += 1;
                }
            },
            Resolution::UseRemote => {
                merged.insert(remote.id().as_str().to_string(), remote.clone());
                deferred.push(SyncEvent::record(
                    SyncEventKind::BookingUpdated,
                    remote,
                    EventSource::Remote,
                ));
                summary.resolved += 1;
            }
            Resolution::Merge(merged_booking) => {
                let merged_booking = *merged_booking;
                // The merge is authoritative for both sides: it lands
                // locally either way, and a failed upload retries from
                // the queue.
                merged.insert(
                    merged_booking.id().as_str().to_string(),
                    merged_booking.clone(),
                );
                if let Err(err) = self.remote.upload(&merged_booking).await {
                    warn!(id = %merged_booking.id(), error = %err, "Merge upload failed, queueing");
                    self.queue.enqueue(merged_booking.clone()).await;
                    summary.queued += 1;
                }
                deferred.push(SyncEvent::record(
                    SyncEventKind::BookingUpdated,
                    merged_booking,
                    EventSource::Engine,
                ));
                summary.resolved += 1;
            }
        }
    }
}
