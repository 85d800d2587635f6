//! # Identity Newtypes
//!
//! A [`Principal`] is the opaque identity of a caller: typically a
//! public-key-derived address such as `0x70997970c51812dc3a010c7d01b50e0d17dc79c8`.
//! The ledger compares principals for equality and set membership only; it
//! never interprets their contents.
//!
//! A [`ShipmentId`] is the sequential identifier the ledger assigns at
//! creation time.
//!
//! ## Validation
//!
//! Principals are opaque: the only malformed value is the empty string,
//! which is rejected at construction and on deserialization.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Route deserialization of a string newtype through its validating
/// constructor, so a snapshot cannot smuggle in an invalid value.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Principal
// ---------------------------------------------------------------------------

/// An authenticated caller identity.
///
/// Ordering is derived only so that sets of principals list deterministically;
/// it carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Principal(String);

impl_validating_deserialize!(Principal);

impl Principal {
    /// Create a principal from its textual identity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyPrincipal`] for an empty string.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() {
            return Err(ValidationError::EmptyPrincipal);
        }
        Ok(Self(s))
    }

    /// Access the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Principal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ShipmentId
// ---------------------------------------------------------------------------

/// Sequential shipment identifier, assigned from 0 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentId(u64);

impl ShipmentId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Position of this shipment in the ledger's append-only collection.
    ///
    /// Returns `None` on targets where the id does not fit in `usize`.
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl From<u64> for ShipmentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShipmentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}
