//! StaySync Reconcile - Difference analysis and conflict resolution
//!
//! Provides:
//! - Deterministic local-vs-remote snapshot diffing over watched fields
//! - A pure, timestamp-based conflict resolution policy
//!
//! Both halves are pure functions of their inputs: identical snapshots
//! always produce the identical difference list, and identical conflicting
//! pairs always produce the identical decision. The engine crate owns all
//! I/O; nothing here touches a store or the network.

pub mod analyzer;
pub mod resolver;

pub use analyzer::DifferenceAnalyzer;
pub use resolver::{ConflictResolver, Resolution};
