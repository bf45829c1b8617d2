//! Peer broadcast port (outbound side of the cross-context channel)
//!
//! Peer execution contexts (other tabs or processes on the same client)
//! share nothing but the remote store and this named broadcast channel.
//! Messages published here tell peers that new data may exist; receivers
//! run their own reconciliation pass instead of trusting the payload.
//!
//! The inbound side is surfaced through
//! [`IConnectivityMonitor::subscribe_peer_updates`](super::connectivity::IConnectivityMonitor).

use crate::domain::event::PeerMessage;

/// Port trait for publishing record-update hints to peer contexts
#[async_trait::async_trait]
pub trait IPeerChannel: Send + Sync {
    /// Publishes one hint; delivery is best-effort with no ordering
    /// guarantee across processes
    async fn publish(&self, message: &PeerMessage) -> anyhow::Result<()>;
}
