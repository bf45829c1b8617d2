//! Connectivity monitor adapters
//!
//! Platform signals (network up/down callbacks, storage events, broadcast
//! channel messages) live outside this crate; a platform driver owns a
//! [`SharedConnectivity`] and feeds it observations. The engine and
//! scheduler only see the [`IConnectivityMonitor`] port.
//!
//! [`AlwaysOnline`] is the degraded adapter for execution contexts without
//! any platform signal: permanently online, no transitions, no peer
//! updates.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tracing::{debug, info};

use staysync_core::domain::event::PeerMessage;
use staysync_core::ports::connectivity::{ConnectivityState, IConnectivityMonitor};

/// Channel capacity for transition and peer-update events
///
/// Hints are cheap to drop; a lagging subscriber simply reconciles on its
/// next tick.
const EVENT_CAPACITY: usize = 64;

/// Connectivity monitor fed by an external platform driver
///
/// `set_online` emits a transition exactly once per state change;
/// repeated observations of the same state are ignored.
pub struct SharedConnectivity {
    online: AtomicBool,
    transitions: broadcast::Sender<ConnectivityState>,
    peer_updates: broadcast::Sender<PeerMessage>,
}

impl SharedConnectivity {
    /// Creates a monitor with the given initial state
    pub fn new(initially_online: bool) -> Self {
        let (transitions, _) = broadcast::channel(EVENT_CAPACITY);
        let (peer_updates, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            online: AtomicBool::new(initially_online),
            transitions,
            peer_updates,
        }
    }

    /// Records an observed connectivity state
    ///
    /// Emits a transition event only when the state actually changed.
    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::AcqRel);
        if previous == online {
            return;
        }

        let state = if online {
            ConnectivityState::Online
        } else {
            ConnectivityState::Offline
        };
        info!(%state, "Connectivity transition");

        if self.transitions.send(state).is_err() {
            debug!("No subscribers for connectivity transition");
        }
    }

    /// Surfaces an update hint received from a peer execution context
    pub fn notify_peer_update(&self, message: PeerMessage) {
        debug!(id = %message.booking.id(), "Peer update hint received");
        if self.peer_updates.send(message).is_err() {
            debug!("No subscribers for peer update hint");
        }
    }
}

impl IConnectivityMonitor for SharedConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    fn subscribe_transitions(&self) -> broadcast::Receiver<ConnectivityState> {
        self.transitions.subscribe()
    }

    fn subscribe_peer_updates(&self) -> broadcast::Receiver<PeerMessage> {
        self.peer_updates.subscribe()
    }
}

/// Stub monitor for contexts without platform connectivity signals
///
/// Always online; the subscription channels exist but never fire.
pub struct AlwaysOnline {
    transitions: broadcast::Sender<ConnectivityState>,
    peer_updates: broadcast::Sender<PeerMessage>,
}

impl AlwaysOnline {
    pub fn new() -> Self {
        let (transitions, _) = broadcast::channel(1);
        let (peer_updates, _) = broadcast::channel(1);
        Self {
            transitions,
            peer_updates,
        }
    }
}

impl Default for AlwaysOnline {
    fn default() -> Self {
        Self::new()
    }
}

impl IConnectivityMonitor for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }

    fn subscribe_transitions(&self) -> broadcast::Receiver<ConnectivityState> {
        self.transitions.subscribe()
    }

    fn subscribe_peer_updates(&self) -> broadcast::Receiver<PeerMessage> {
        self.peer_updates.subscribe()
    }
}
