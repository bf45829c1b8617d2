//! Sync queue - FIFO upload buffer with bounded retry
//!
//! Bookings land here when an upload fails while online or when a
//! mutation happens while offline. `drain` attempts every queued entry
//! once, in FIFO order; entries leave the queue on success or when their
//! attempt counter reaches the configured maximum.
//!
//! Entry lifecycle:
//!
//! ```text
//! Queued ──► Uploading ──► Synced (removed, booking_created/updated)
//!               │
//!               ├──► Queued (attempts+1, attempts < max)
//!               └──► Failed (removed, attempts == max, one sync_failed)
//! ```

use std::collections::VecDeque;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use staysync_core::domain::booking::Booking;
use staysync_core::domain::event::{EventSource, SyncEvent, SyncEventKind};
use staysync_core::ports::remote_store::IRemoteStore;

use crate::bus::EventBus;

/// One booking awaiting upload
#[derive(Debug, Clone)]
pub struct SyncQueueEntry {
    pub booking: Booking,
    pub attempts: u32,
}

/// Summary of one drain cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainOutcome {
    /// Entries uploaded and removed
    pub uploaded: u32,
    /// Entries that failed and stayed queued
    pub requeued: u32,
    /// Entries removed after exhausting the retry budget
    pub exhausted: u32,
}

/// FIFO upload queue with a bounded per-entry retry budget
pub struct SyncQueue {
    entries: Mutex<VecDeque<SyncQueueEntry>>,
    max_attempts: u32,
}

impl SyncQueue {
    /// Creates a queue allowing `max_attempts` upload attempts per entry
    pub fn new(max_attempts: u32) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            max_attempts,
        }
    }

    /// Adds a booking to the queue
    ///
    /// A booking already queued under the same id is replaced in place:
    /// the newer payload keeps the original position and attempt counter,
    /// so one record never occupies two queue slots.
    pub async fn enqueue(&self, booking: Booking) {
        let mut entries = self.entries.lock().await;

        if let Some(existing) = entries
            .iter_mut()
            .find(|entry| entry.booking.id() == booking.id())
        {
            debug!(id = %booking.id(), "Replacing queued booking with newer payload");
            existing.booking = booking;
            return;
        }

        debug!(id = %booking.id(), position = entries.len(), "Booking queued for upload");
        entries.push_back(SyncQueueEntry {
            booking,
            attempts: 0,
        });
    }

    /// Number of queued entries
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// True when nothing is queued
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Sum of attempt counters across queued entries
    ///
    /// Surfaced as `retry_count` in the engine's status snapshot.
    pub async fn total_attempts(&self) -> u32 {
        self.entries.lock().await.iter().map(|e| e.attempts).sum()
    }

    /// Attempts to upload every queued entry once, in FIFO order
    ///
    /// Successful uploads are removed and emit the receipt-appropriate
    /// event. Failures increment the attempt counter and stay queued,
    /// unless the counter has reached the maximum, in which case the
    /// entry is removed and exactly one `sync_failed` event fires.
    pub async fn drain(&self, remote: &dyn IRemoteStore, bus: &EventBus) -> DrainOutcome {
        let taken: Vec<SyncQueueEntry> = {
            let mut entries = self.entries.lock().await;
            entries.drain(..).collect()
        };

        if taken.is_empty() {
            return DrainOutcome::default();
        }

        debug!(entries = taken.len(), "Draining sync queue");

        let mut outcome = DrainOutcome::default();
        let mut retained: Vec<SyncQueueEntry> = Vec::new();

        for mut entry in taken {
            match remote.upload(&entry.booking).await {
                Ok(receipt) => {
                    let kind = if receipt.created {
                        SyncEventKind::BookingCreated
                    } else {
                        SyncEventKind::BookingUpdated
                    };
                    bus.publish(SyncEvent::record(kind, receipt.booking, EventSource::Local))
                        .await;
                    outcome.uploaded += 1;
                }
                Err(err) => {
                    entry.attempts += 1;
                    if entry.attempts >= self.max_attempts {
                        warn!(
                            id = %entry.booking.id(),
                            attempts = entry.attempts,
                            error = %err,
                            "Upload retries exhausted, dropping booking from queue"
                        );
                        bus.publish(SyncEvent::failure(
                            entry.booking,
                            format!("upload failed after {} attempts", entry.attempts),
                        ))
                        .await;
                        outcome.exhausted += 1;
                    } else {
                        debug!(
                            id = %entry.booking.id(),
                            attempts = entry.attempts,
                            error = %err,
                            "Upload failed, keeping booking queued"
                        );
                        retained.push(entry);
                        outcome.requeued += 1;
                    }
                }
            }
        }

        if !retained.is_empty() {
            // Entries enqueued during the drain go behind the survivors.
            let mut entries = self.entries.lock().await;
            for entry in retained.into_iter().rev() {
                entries.push_front(entry);
            }
        }

        info!(
            uploaded = outcome.uploaded,
            requeued = outcome.requeued,
            exhausted = outcome.exhausted,
            "Drain cycle finished"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex as StdMutex;

    use staysync_core::domain::booking::BookingStatus;
    use staysync_core::domain::newtypes::BookingId;
    use staysync_core::ports::remote_store::UploadReceipt;

    /// Remote store double: records upload order, fails on demand.
    struct FakeRemote {
        accepted: StdMutex<Vec<String>>,
        known: StdMutex<BTreeMap<String, Booking>>,
        failing: AtomicBool,
    }

    impl FakeRemote {
        fn new() -> Self {
            Self {
                accepted: StdMutex::new(Vec::new()),
                known: StdMutex::new(BTreeMap::new()),
                failing: AtomicBool::new(false),
            }
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn upload_order(&self) -> Vec<String> {
            self.accepted.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl IRemoteStore for FakeRemote {
        async fn fetch_all(&self) -> anyhow::Result<Vec<Booking>> {
            Ok(self.known.lock().unwrap().values().cloned().collect())
        }

        async fn upload(&self, booking: &Booking) -> anyhow::Result<UploadReceipt> {
            if self.failing.load(Ordering::SeqCst) {
                anyhow::bail!("503 service unavailable");
            }
            let created = self
                .known
                .lock()
                .unwrap()
                .insert(booking.id().as_str().to_string(), booking.clone())
                .is_none();
            self.accepted
                .lock()
                .unwrap()
                .push(booking.id().as_str().to_string());
            Ok(UploadReceipt {
                booking: booking.clone(),
                created,
            })
        }
    }

    fn booking(id: &str) -> Booking {
        Booking::new(BookingId::new(id).unwrap(), BookingStatus::Reserved, 880.0)
    }

    fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<SyncEvent>) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_drain_uploads_in_fifo_order() {
        let queue = SyncQueue::new(3);
        let remote = FakeRemote::new();
        let bus = EventBus::new(64, None);

        queue.enqueue(booking("B1")).await;
        queue.enqueue(booking("B2")).await;
        queue.enqueue(booking("B3")).await;

        let outcome = queue.drain(&remote, &bus).await;

        assert_eq!(outcome.uploaded, 3);
        assert_eq!(remote.upload_order(), vec!["B1", "B2", "B3"]);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn test_successful_upload_emits_created_then_updated() {
        let queue = SyncQueue::new(3);
        let remote = FakeRemote::new();
        let bus = EventBus::new(64, None);
        let mut rx = bus.subscribe();

        queue.enqueue(booking("B1")).await;
        queue.drain(&remote, &bus).await;

        // Second upload of the same id is an update as far as the remote
        // store is concerned.
        queue.enqueue(booking("B1")).await;
        queue.drain(&remote, &bus).await;

        let events = drain_events(&mut rx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, SyncEventKind::BookingCreated);
        assert_eq!(events[1].kind, SyncEventKind::BookingUpdated);
        assert_eq!(events[0].source, EventSource::Local);
    }

    #[tokio::test]
    async fn test_failed_upload_stays_queued_with_attempt() {
        let queue = SyncQueue::new(3);
        let remote = FakeRemote::new();
        remote.set_failing(true);
        let bus = EventBus::new(64, None);

        queue.enqueue(booking("B1")).await;
        let outcome = queue.drain(&remote, &bus).await;

        assert_eq!(outcome.requeued, 1);
        assert_eq!(queue.len().await, 1);
        assert_eq!(queue.total_attempts().await, 1);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_emits_exactly_one_failure() {
        let queue = SyncQueue::new(3);
        let remote = FakeRemote::new();
        remote.set_failing(true);
        let bus = EventBus::new(64, None);
        let mut rx = bus.subscribe();

        queue.enqueue(booking("B1")).await;
        queue.drain(&remote, &bus).await;
        queue.drain(&remote, &bus).await;
        let outcome = queue.drain(&remote, &bus).await;

        assert_eq!(outcome.exhausted, 1);
        assert!(queue.is_empty().await);

        let events = drain_events(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SyncEventKind::SyncFailed);
        assert_eq!(
            events[0].error.as_deref(),
            Some("upload failed after 3 attempts")
        );
        assert_eq!(
            events[0].booking.as_ref().unwrap().id().as_str(),
            "B1"
        );

        // No further retries happen for the dropped entry.
        let outcome = queue.drain(&remote, &bus).await;
        assert_eq!(outcome, DrainOutcome::default());
        assert!(drain_events(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_preserves_order_of_survivors() {
        let queue = SyncQueue::new(3);
        let remote = FakeRemote::new();
        let bus = EventBus::new(64, None);

        remote.set_failing(true);
        queue.enqueue(booking("B1")).await;
        queue.enqueue(booking("B2")).await;
        queue.drain(&remote, &bus).await;

        remote.set_failing(false);
        queue.drain(&remote, &bus).await;

        assert_eq!(remote.upload_order(), vec!["B1", "B2"]);
    }

    #[tokio::test]
    async fn test_enqueue_replaces_same_id_in_place() {
        let queue = SyncQueue::new(3);

        queue.enqueue(booking("B1")).await;
        queue.enqueue(booking("B2")).await;

        let mut newer = booking("B1");
        newer.set_total_amount(9999.0);
        queue.enqueue(newer).await;

        assert_eq!(queue.len().await, 2);

        let remote = FakeRemote::new();
        let bus = EventBus::new(64, None);
        queue.drain(&remote, &bus).await;

        // B1 kept its original FIFO position and carries the newer amount.
        assert_eq!(remote.upload_order(), vec!["B1", "B2"]);
        let known = remote.known.lock().unwrap();
        assert_eq!(known.get("B1").unwrap().total_amount(), 9999.0);
    }

    #[tokio::test]
    async fn test_drain_empty_queue_is_noop() {
        let queue = SyncQueue::new(3);
        let remote = FakeRemote::new();
        let bus = EventBus::new(64, None);

        assert_eq!(queue.drain(&remote, &bus).await, DrainOutcome::default());
    }
}
