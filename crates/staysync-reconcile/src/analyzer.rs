//! Snapshot difference analysis
//!
//! Compares a local snapshot against a remote snapshot of bookings and
//! classifies every id into missing-remote, missing-local, or conflict.
//! Only the watched-field subset counts as divergence; see
//! [`Booking::diverges_from`].

use std::collections::BTreeMap;

use tracing::debug;

use staysync_core::domain::booking::Booking;
use staysync_core::domain::diff::{DiffReport, Difference};

/// Classifies bookings across the local and remote snapshots
///
/// Pure and total: malformed records (blank id) are excluded from the
/// comparison and counted on the report instead of raising an error.
pub struct DifferenceAnalyzer;

impl DifferenceAnalyzer {
    /// Analyzes the two snapshots into an ordered difference list
    ///
    /// Output order is ascending booking id, so resolution is reproducible
    /// across passes and in tests. A record present in both snapshots with
    /// equal watched fields produces no difference.
    pub fn analyze(local: &[Booking], remote: &[Booking]) -> DiffReport {
        let (local_map, malformed_local) = index_by_id(local);
        let (remote_map, malformed_remote) = index_by_id(remote);

        let mut differences = Vec::new();

        // BTreeMap iteration gives ascending-id order; walk the union of
        // both key sets.
        let mut ids: Vec<&str> = local_map.keys().copied().collect();
        for id in remote_map.keys() {
            if !local_map.contains_key(id) {
                ids.push(id);
            }
        }
        ids.sort_unstable();

        for id in ids {
            match (local_map.get(id), remote_map.get(id)) {
                (Some(l), None) => differences.push(Difference::MissingRemote {
                    local: (*l).clone(),
                }),
                (None, Some(r)) => differences.push(Difference::MissingLocal {
                    remote: (*r).clone(),
                }),
                (Some(l), Some(r)) => {
                    if l.diverges_from(r) {
                        differences.push(Difference::Conflict {
                            local: (*l).clone(),
                            remote: (*r).clone(),
                        });
                    }
                }
                (None, None) => unreachable!("id came from one of the maps"),
            }
        }

        if malformed_local > 0 || malformed_remote > 0 {
            debug!(
                malformed_local,
                malformed_remote, "Excluded records without a usable id"
            );
        }

        DiffReport {
            differences,
            malformed_local,
            malformed_remote,
        }
    }
}

/// Indexes a snapshot by id, dropping records with a blank id
///
/// Duplicate ids within one snapshot collapse to the last occurrence,
/// keeping the single-authoritative-copy invariant inside each map.
fn index_by_id(bookings: &[Booking]) -> (BTreeMap<&str, &Booking>, usize) {
    let mut map = BTreeMap::new();
    let mut malformed = 0usize;

    for booking in bookings {
        if booking.has_blank_id() {
            malformed += 1;
            continue;
        }
        map.insert(booking.id().as_str(), booking);
    }

    (map, malformed)
}
