//! Hotel (tenant) types.
//!
//! A hotel is the isolation scope for rooms and bookings. Its identifier is
//! the only input used to derive the names of its dynamic tables, so it is
//! validated on construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::booking::ValidationError;

/// A valid hotel identifier (strictly positive).
///
/// # Examples
///
/// ```
/// use innkeep::HotelId;
///
/// let id = HotelId::try_from(7).unwrap();
/// assert_eq!(id.value(), 7);
/// assert!(HotelId::try_from(0).is_err());
/// assert!(HotelId::try_from(-3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HotelId(i64);

impl HotelId {
    /// Returns the underlying identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for HotelId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            Err(ValidationError {
                field: "hotel_id".into(),
                message: format!("hotel id must be positive, got {value}"),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl<'de> Deserialize<'de> for HotelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for HotelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl rusqlite::ToSql for HotelId {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::from(self.0))
    }
}

/// A stored hotel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    /// Identifier.
    pub id: HotelId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Owning user, if any.
    pub owner_id: Option<i64>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Input for provisioning a new hotel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHotel {
    /// Display name (required).
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Owning user, if any.
    #[serde(default)]
    pub owner_id: Option<i64>,
}

impl NewHotel {
    /// Creates a new hotel input with just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Checks that required fields are present.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError {
                field: "name".into(),
                message: "hotel name must be non-empty".into(),
            });
        }
        Ok(())
    }
}
