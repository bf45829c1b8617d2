//! StaySync Store - Local snapshot adapters
//!
//! Implementations of the [`ILocalStore`](staysync_core::ports::local_store::ILocalStore)
//! port:
//!
//! - [`JsonFileStore`] - a JSON file holding the full booking snapshot,
//!   written atomically (temp + rename)
//! - [`MemoryStore`] - an in-memory snapshot for tests and embeddings

pub mod json_store;
pub mod memory;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
