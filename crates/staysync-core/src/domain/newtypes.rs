//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for domain identifiers. Each newtype validates
//! at construction time; values arriving over the wire bypass construction
//! (serde is `transparent`), so snapshot consumers must treat an empty id
//! as a malformed record rather than assume the invariant holds.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

/// Identifier of a booking record
///
/// Globally unique, assigned when the booking is created, immutable
/// afterwards. The inner value is an opaque string because ids are minted
/// by whichever side created the record first (client or server).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Create a BookingId from an existing string, rejecting empty values
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidBookingId("<empty>".to_string()));
        }
        Ok(Self(id))
    }

    /// Mint a fresh random id for a newly created booking
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id carries no usable value
    ///
    /// Deserialized snapshots can contain blank ids; such records are
    /// excluded from reconciliation and reported as malformed.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for BookingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for BookingId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
