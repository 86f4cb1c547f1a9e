//! Room inventory types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::booking::ValidationError;
use crate::Money;

/// Identifier of a room within its hotel's rooms table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl rusqlite::ToSql for RoomId {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::from(self.0))
    }
}

/// Informational room status.
///
/// This is a display cache; real availability is always computed from
/// bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// No current booking recorded.
    Available,
    /// A booking was recorded against the room.
    Booked,
    /// Out of service.
    Maintenance,
}

impl RoomStatus {
    /// The stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "booked" => Ok(Self::Booked),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown room status '{other}'"),
            }),
        }
    }
}

/// A room as stored in a hotel's rooms table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Row identifier.
    pub id: RoomId,
    /// Room number, unique within the hotel.
    pub room_number: String,
    /// Category label.
    pub category: Option<String>,
    /// Nightly price.
    pub price: Money,
    /// Free-form description.
    pub description: Option<String>,
    /// Cached status.
    pub status: RoomStatus,
}

/// Input for adding a room to a hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    /// Room number (required, unique within the hotel).
    pub room_number: String,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Nightly price.
    pub price: Money,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl NewRoom {
    /// Creates a room input with the required fields.
    #[must_use]
    pub fn new(room_number: impl Into<String>, price: Money) -> Self {
        Self {
            room_number: room_number.into(),
            category: None,
            price,
            description: None,
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Checks that required fields are present and sane.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank room number or a negative price.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.room_number.trim().is_empty() {
            return Err(ValidationError {
                field: "room_number".into(),
                message: "room number must be non-empty".into(),
            });
        }
        if self.price.is_negative() {
            return Err(ValidationError {
                field: "price".into(),
                message: "price must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// A partial room update. Only supplied fields are modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdate {
    /// New nightly price.
    #[serde(default)]
    pub price: Option<Money>,
    /// New category.
    #[serde(default)]
    pub category: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

impl RoomUpdate {
    /// Returns true if no field is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.category.is_none() && self.description.is_none()
    }

    /// Checks the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is supplied or the price is negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError {
                field: "update".into(),
                message: "at least one of price, category, description is required".into(),
            });
        }
        if self.price.is_some_and(Money::is_negative) {
            return Err(ValidationError {
                field: "price".into(),
                message: "price must not be negative".into(),
            });
        }
        Ok(())
    }
}
