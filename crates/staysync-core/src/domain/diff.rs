//! Snapshot difference classification
//!
//! A `Difference` is the relationship of one booking id between the local
//! and remote snapshots during a reconciliation pass. Differences are
//! produced fresh on every pass and never persisted.

use super::booking::Booking;
use super::newtypes::BookingId;

/// Classification of one record across the two snapshots
#[derive(Debug, Clone, PartialEq)]
pub enum Difference {
    /// Present only in the local snapshot; candidate for upload
    MissingRemote { local: Booking },
    /// Present only in the remote snapshot; candidate for download
    MissingLocal { remote: Booking },
    /// Present in both with diverging watched fields; needs resolution
    Conflict { local: Booking, remote: Booking },
}

impl Difference {
    /// The id this difference is about
    pub fn booking_id(&self) -> &BookingId {
        match self {
            Difference::MissingRemote { local } => local.id(),
            Difference::MissingLocal { remote } => remote.id(),
            Difference::Conflict { local, .. } => local.id(),
        }
    }
}

/// Result of analyzing a local snapshot against a remote snapshot
///
/// `differences` is ordered by ascending booking id so resolution is
/// reproducible. Records with blank ids are excluded from comparison and
/// only counted here; the engine reports them once per pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    pub differences: Vec<Difference>,
    pub malformed_local: usize,
    pub malformed_remote: usize,
}

impl DiffReport {
    /// True when the snapshots agree on every watched field
    pub fn is_clean(&self) -> bool {
        self.differences.is_empty()
    }

    /// True when either snapshot contained records without a usable id
    pub fn has_malformed(&self) -> bool {
        self.malformed_local > 0 || self.malformed_remote > 0
    }
}
