//! Sync scheduler - turns triggers into reconciliation work
//!
//! The [`SyncScheduler`] owns the engine's reactive loop. Three trigger
//! sources feed it:
//!
//! ```text
//! periodic tick ─────────┐
//! connectivity monitor ──┼──► drain queue + reconciliation pass
//! peer update hints ─────┘
//! ```
//!
//! The loop terminates when the engine's cancellation token fires
//! ([`SyncEngine::destroy`](crate::engine::SyncEngine::destroy)), dropping
//! the timer and every channel subscription with it.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use staysync_core::ports::connectivity::ConnectivityState;

use crate::engine::SyncEngine;

/// Drives an engine from timers, connectivity transitions, and peer hints
pub struct SyncScheduler {
    engine: Arc<SyncEngine>,
}

impl SyncScheduler {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine }
    }

    /// Main trigger loop
    ///
    /// The first tick of the interval fires immediately, which gives a
    /// startup reconciliation pass. Subsequent ticks follow the engine's
    /// configured interval. Runs until the engine is destroyed.
    pub async fn run(&self) {
        let cancel = self.engine.shutdown_token();
        let mut transitions = self.engine.connectivity().subscribe_transitions();
        let mut peer_updates = self.engine.connectivity().subscribe_peer_updates();

        let mut tick = tokio::time::interval(self.engine.interval());
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.engine.interval().as_secs(),
            "Sync scheduler starting"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutdown requested, scheduler stopping");
                    break;
                }

                _ = tick.tick() => {
                    if !self.engine.is_online() {
                        debug!("Periodic tick while offline, skipping");
                        continue;
                    }
                    if !self.engine.queue_is_empty().await {
                        self.engine.drain_queue().await;
                    }
                    self.engine.force_sync().await;
                }

                result = transitions.recv() => match result {
                    Ok(ConnectivityState::Online) => {
                        info!("Online transition, flushing queue and reconciling");
                        self.engine.drain_queue().await;
                        self.engine.force_sync().await;
                    }
                    Ok(ConnectivityState::Offline) => {
                        debug!("Offline transition, reconciliation paused");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Connectivity transitions lagged");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Connectivity monitor dropped, scheduler stopping");
                        break;
                    }
                },

                result = peer_updates.recv() => match result {
                    Ok(message) => {
                        debug!(id = %message.booking.id(), "Peer update hint, reconciling");
                        self.engine.force_sync().await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Hints are idempotent; one pass covers them all.
                        warn!(skipped, "Peer update hints lagged");
                        self.engine.force_sync().await;
                    }
                    Err(RecvError::Closed) => {
                        debug!("Peer update channel dropped, scheduler stopping");
                        break;
                    }
                },
            }
        }

        info!("Sync scheduler stopped");
    }
}
