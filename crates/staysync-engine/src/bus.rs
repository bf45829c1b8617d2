//! Event bus
//!
//! Delivers [`SyncEvent`]s to in-process subscribers and forwards
//! record-level events to peer execution contexts through the
//! [`IPeerChannel`] port. Subscribers unsubscribe by dropping their
//! receiver. Delivery is best-effort FIFO within the process; cross-context
//! delivery is a hint to re-reconcile, not a source of truth.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use staysync_core::domain::event::{PeerMessage, SyncEvent};
use staysync_core::ports::broadcast::IPeerChannel;

/// In-process event fan-out with optional cross-context forwarding
pub struct EventBus {
    local: broadcast::Sender<SyncEvent>,
    peer: Option<Arc<dyn IPeerChannel>>,
}

impl EventBus {
    /// Creates a bus with the given channel capacity
    ///
    /// `peer` is the outbound cross-context channel; `None` keeps all
    /// events process-local (e.g. in tests or single-context embeddings).
    pub fn new(capacity: usize, peer: Option<Arc<dyn IPeerChannel>>) -> Self {
        let (local, _) = broadcast::channel(capacity);
        Self { local, peer }
    }

    /// Subscribes to all events; dropping the receiver unsubscribes
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.local.subscribe()
    }

    /// Number of live in-process subscribers
    pub fn subscriber_count(&self) -> usize {
        self.local.receiver_count()
    }

    /// Publishes one event
    ///
    /// Record-level events carrying a booking are additionally forwarded
    /// to peer contexts. A publish failure on the peer channel is logged
    /// and swallowed: peers will catch up on their next periodic pass.
    pub async fn publish(&self, event: SyncEvent) {
        let forward = event.kind.is_record_level();
        let booking = event.booking.clone();

        if self.local.send(event).is_err() {
            debug!("No in-process subscribers for event");
        }

        if forward {
            if let (Some(peer), Some(booking)) = (&self.peer, booking) {
                let message = PeerMessage::booking_update(booking);
                if let Err(err) = peer.publish(&message).await {
                    warn!(error = %err, "Failed to broadcast update hint to peers");
                }
            }
        }
    }
}
