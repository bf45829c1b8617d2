//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the interfaces the reconciliation engine depends on; their
//! implementations live in adapter crates (or in test doubles).
//!
//! ## Ports Overview
//!
//! - [`ILocalStore`] - The locally cached booking snapshot
//! - [`IRemoteStore`] - The remote authoritative bookings API
//! - [`IConnectivityMonitor`] - Online/offline state and peer-update hints
//! - [`IPeerChannel`] - Outbound cross-context broadcast of record updates

pub mod broadcast;
pub mod connectivity;
pub mod local_store;
pub mod remote_store;

pub use broadcast::IPeerChannel;
pub use connectivity::{ConnectivityState, IConnectivityMonitor};
pub use local_store::ILocalStore;
pub use remote_store::{IRemoteStore, UploadReceipt};
