//! Connectivity monitor port
//!
//! Abstracts the platform's online/offline signal and the inbound side of
//! the cross-context broadcast channel, so the engine core never touches
//! platform event listeners directly. Environments without the underlying
//! signals use a stub adapter that reports always-online and never fires.

use std::fmt;

use tokio::sync::broadcast;

use crate::domain::event::PeerMessage;

/// Online/offline state as seen by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn is_online(&self) -> bool {
        matches!(self, ConnectivityState::Online)
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityState::Online => write!(f, "online"),
            ConnectivityState::Offline => write!(f, "offline"),
        }
    }
}

/// Port trait for connectivity tracking and peer-update hints
///
/// Subscribing has no side effects beyond registration. Transition events
/// fire exactly once per state change; peer updates are best-effort hints
/// that new data may exist, never applied as truth.
pub trait IConnectivityMonitor: Send + Sync {
    /// Current online/offline state
    fn is_online(&self) -> bool;

    /// Subscribe to online/offline transitions
    fn subscribe_transitions(&self) -> broadcast::Receiver<ConnectivityState>;

    /// Subscribe to update hints arriving from peer execution contexts
    fn subscribe_peer_updates(&self) -> broadcast::Receiver<PeerMessage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_helpers() {
        assert!(ConnectivityState::Online.is_online());
        assert!(!ConnectivityState::Offline.is_online());
        assert_eq!(ConnectivityState::Offline.to_string(), "offline");
    }
}
