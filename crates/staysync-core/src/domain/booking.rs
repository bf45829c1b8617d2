//! Booking domain entity
//!
//! The `Booking` is the unit of synchronization. Two copies of the same
//! booking are compared over a fixed subset of fields (the *watched*
//! fields); anything outside that subset never counts as divergence.
//!
//! `updated_at` is monotonically non-decreasing across successive
//! mutations of the same record, so timestamp-based conflict resolution
//! stays well-ordered even when wall clocks wobble.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::newtypes::BookingId;

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created but not yet confirmed
    #[default]
    Pending,
    /// Confirmed with the customer, dates held
    Reserved,
    /// Contract active, tenant moved in
    Leased,
    /// Cancelled by either party
    Cancelled,
    /// Closed out, handed over to accounting
    Accounting,
}

impl BookingStatus {
    /// True for statuses that still occupy the property
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Reserved | BookingStatus::Leased)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Reserved => "reserved",
            BookingStatus::Leased => "leased",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Accounting => "accounting",
        };
        write!(f, "{}", s)
    }
}

/// Contact details entered for the booking's customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl CustomerInfo {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }
}

/// A booking record, the unit of synchronization
///
/// Field names follow the wire format of the bookings API (camelCase).
/// Mutations go through the setters so `updated_at` stays monotonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    id: BookingId,
    status: BookingStatus,
    total_amount: f64,
    contract_signed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_info: Option<CustomerInfo>,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Creates a new booking with a fresh `created_at` and no mutations yet
    pub fn new(id: BookingId, status: BookingStatus, total_amount: f64) -> Self {
        Self {
            id,
            status,
            total_amount,
            contract_signed: false,
            customer_info: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Reconstructs a booking from explicit parts
    ///
    /// Used by adapters and by conflict resolution, which must control
    /// every field (including timestamps) instead of reading the clock.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: BookingId,
        status: BookingStatus,
        total_amount: f64,
        contract_signed: bool,
        customer_info: Option<CustomerInfo>,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            status,
            total_amount,
            contract_signed,
            customer_info,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &BookingId {
        &self.id
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn contract_signed(&self) -> bool {
        self.contract_signed
    }

    pub fn customer_info(&self) -> Option<&CustomerInfo> {
        self.customer_info.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// The timestamp used for conflict resolution
    ///
    /// `updated_at` when the record has been mutated, `created_at`
    /// otherwise.
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    pub fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
        self.touch();
    }

    pub fn set_total_amount(&mut self, amount: f64) {
        self.total_amount = amount;
        self.touch();
    }

    pub fn set_contract_signed(&mut self, signed: bool) {
        self.contract_signed = signed;
        self.touch();
    }

    pub fn set_customer_info(&mut self, info: Option<CustomerInfo>) {
        self.customer_info = info;
        self.touch();
    }

    /// Bumps `updated_at`, clamped so it never moves backwards
    fn touch(&mut self) {
        self.touch_at(Utc::now());
    }

    /// Bumps `updated_at` to `at`, clamped so it never moves backwards
    pub fn touch_at(&mut self, at: DateTime<Utc>) {
        let floor = self.modified_at();
        self.updated_at = Some(at.max(floor));
    }

    /// Compares the watched-field subset against another copy
    ///
    /// Watched fields: `status`, `total_amount`, `contract_signed`,
    /// `customer_info`. Timestamps and any future unwatched fields never
    /// trigger a conflict on their own.
    pub fn diverges_from(&self, other: &Booking) -> bool {
        self.status != other.status
            || self.total_amount != other.total_amount
            || self.contract_signed != other.contract_signed
            || self.customer_info != other.customer_info
    }

    /// True when the record's id carries no usable value
    pub fn has_blank_id(&self) -> bool {
        self.id.is_blank()
    }
}
