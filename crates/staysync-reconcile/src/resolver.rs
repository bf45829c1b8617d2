//! Conflict resolution policy
//!
//! Decides, for a conflicting pair, which record survives. The policy is
//! a deterministic timestamp comparison expressed as a pure function:
//! identical inputs always produce the identical decision, so resolution
//! is reproducible across passes, peers, and tests.
//!
//! - Strictly newer `modified_at` wins outright.
//! - An exact tie produces a merge: the remote record is the structural
//!   base, and the local `customer_info` overrides when present, since
//!   locally entered contact details are more likely fresh.

use chrono::{DateTime, Utc};
use tracing::debug;

use staysync_core::domain::booking::Booking;

/// The decision for one conflicting pair
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Local record is newer; upload it in full
    UseLocal,
    /// Remote record is newer; take it locally in full
    UseRemote,
    /// Timestamps tie; the merged record is uploaded and taken locally
    Merge(Box<Booking>),
}

impl Resolution {
    /// Short tag for logging
    pub fn tag(&self) -> &'static str {
        match self {
            Resolution::UseLocal => "use_local",
            Resolution::UseRemote => "use_remote",
            Resolution::Merge(_) => "merge",
        }
    }
}

/// Deterministic resolution of diverging booking pairs
pub struct ConflictResolver;

impl ConflictResolver {
    /// Resolves one conflicting pair
    ///
    /// Pure in all three arguments: identical inputs always produce the
    /// identical decision. `resolved_at` becomes the merged record's
    /// `updated_at` on a tie; callers pass the current time.
    pub fn resolve(local: &Booking, remote: &Booking, resolved_at: DateTime<Utc>) -> Resolution {
        let local_ts = local.modified_at();
        let remote_ts = remote.modified_at();

        let resolution = if local_ts > remote_ts {
            Resolution::UseLocal
        } else if remote_ts > local_ts {
            Resolution::UseRemote
        } else {
            Resolution::Merge(Box::new(Self::merge(local, remote, resolved_at)))
        };

        debug!(
            id = %local.id(),
            local_ts = %local_ts,
            remote_ts = %remote_ts,
            resolution = resolution.tag(),
            "Resolved conflicting pair"
        );

        resolution
    }

    /// Builds the tie-break merge
    ///
    /// Remote is the base for every field except `customer_info`, which
    /// the local copy overrides when it has one.
    fn merge(local: &Booking, remote: &Booking, resolved_at: DateTime<Utc>) -> Booking {
        let customer_info = local
            .customer_info()
            .cloned()
            .or_else(|| remote.customer_info().cloned());

        Booking::from_parts(
            remote.id().clone(),
            remote.status(),
            remote.total_amount(),
            remote.contract_signed(),
            customer_info,
            remote.created_at(),
            Some(resolved_at),
        )
    }
}
