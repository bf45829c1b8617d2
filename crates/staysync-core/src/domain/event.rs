//! Sync lifecycle events
//!
//! Events are the engine's only reporting surface: one event per completed
//! operation (upload, download, resolution, or queue exhaustion), never
//! speculative, never replayed. Record-level events are additionally
//! forwarded to peer execution contexts as reconciliation hints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::booking::Booking;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncEventKind {
    /// A booking was created on the side named by `source`
    BookingCreated,
    /// A booking was updated on the side named by `source`
    BookingUpdated,
    /// A booking was deleted
    BookingDeleted,
    /// A reconciliation pass applied at least one change and finished
    SyncCompleted,
    /// An upload exhausted its retry budget
    SyncFailed,
    /// Malformed records were excluded from a reconciliation pass
    MalformedRecords,
}

impl SyncEventKind {
    /// True for events that describe a single booking record
    ///
    /// Only these are forwarded across execution contexts; lifecycle and
    /// diagnostic events stay process-local.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            SyncEventKind::BookingCreated
                | SyncEventKind::BookingUpdated
                | SyncEventKind::BookingDeleted
        )
    }
}

impl fmt::Display for SyncEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncEventKind::BookingCreated => "booking_created",
            SyncEventKind::BookingUpdated => "booking_updated",
            SyncEventKind::BookingDeleted => "booking_deleted",
            SyncEventKind::SyncCompleted => "sync_completed",
            SyncEventKind::SyncFailed => "sync_failed",
            SyncEventKind::MalformedRecords => "malformed_records",
        };
        write!(f, "{}", s)
    }
}

/// Which side the change originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// A local mutation pushed outward
    Local,
    /// The remote authoritative store
    Remote,
    /// The engine itself (merges, diagnostics, pass summaries)
    Engine,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventSource::Local => "local",
            EventSource::Remote => "remote",
            EventSource::Engine => "engine",
        };
        write!(f, "{}", s)
    }
}

/// A single emitted lifecycle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncEvent {
    pub kind: SyncEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub source: EventSource,
}

impl SyncEvent {
    /// Event describing a completed operation on one booking
    pub fn record(kind: SyncEventKind, booking: Booking, source: EventSource) -> Self {
        Self {
            kind,
            booking: Some(booking),
            error: None,
            timestamp: Utc::now(),
            source,
        }
    }

    /// Terminal failure for one booking after the retry budget ran out
    pub fn failure(booking: Booking, error: impl Into<String>) -> Self {
        Self {
            kind: SyncEventKind::SyncFailed,
            booking: Some(booking),
            error: Some(error.into()),
            timestamp: Utc::now(),
            source: EventSource::Engine,
        }
    }

    /// Pass-level event with no record payload
    pub fn engine(kind: SyncEventKind) -> Self {
        Self {
            kind,
            booking: None,
            error: None,
            timestamp: Utc::now(),
            source: EventSource::Engine,
        }
    }

    /// Diagnostic event for records excluded from a pass
    pub fn diagnostic(error: impl Into<String>) -> Self {
        Self {
            kind: SyncEventKind::MalformedRecords,
            booking: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
            source: EventSource::Engine,
        }
    }
}

/// Cross-context broadcast payload
///
/// Delivered to peer execution contexts (other tabs or processes sharing
/// the same client). Receivers treat it purely as a trigger to run their
/// own reconciliation pass; the embedded booking is a hint, not truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub booking: Booking,
    pub timestamp: DateTime<Utc>,
}

impl PeerMessage {
    /// The only message kind currently on the channel
    pub const BOOKING_UPDATE: &'static str = "booking_update";

    pub fn booking_update(booking: Booking) -> Self {
        Self {
            kind: Self::BOOKING_UPDATE.to_string(),
            booking,
            timestamp: Utc::now(),
        }
    }
}
