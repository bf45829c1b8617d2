//! StaySync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Booking`, `SyncEvent`, `Difference`
//! - **Port definitions** - Traits for adapters: `ILocalStore`, `IRemoteStore`,
//!   `IConnectivityMonitor`, `IPeerChannel`
//! - **Configuration** - Typed YAML configuration for the engine and adapters
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! The reconciliation engine orchestrates domain entities through ports.

pub mod config;
pub mod domain;
pub mod ports;
