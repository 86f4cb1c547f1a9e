//! Append-only booking history.
//!
//! Every booking mutation writes one record with JSON snapshots of the
//! values before and after. Records reference a hotel and booking by id but
//! are not owned by either: they are never updated or deleted, including
//! when the hotel itself is torn down.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::booking::{BookingId, ValidationError};
use crate::error::Result;
use crate::HotelId;

/// The kind of mutation recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Booking created.
    Created,
    /// Booking changed.
    Updated,
    /// Booking removed.
    Deleted,
}

impl AuditAction {
    /// The stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            other => Err(ValidationError {
                field: "action".into(),
                message: format!("unknown audit action '{other}'"),
            }),
        }
    }
}

/// One stored history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Row identifier.
    pub id: i64,
    /// Hotel the booking belonged to.
    pub hotel_id: i64,
    /// Booking the record describes.
    pub booking_id: BookingId,
    /// Kind of mutation.
    pub action: AuditAction,
    /// Snapshot before the mutation.
    pub old_values: Option<serde_json::Value>,
    /// Snapshot after the mutation.
    pub new_values: Option<serde_json::Value>,
    /// Principal that made the change.
    pub changed_by: Option<String>,
    /// When the change was recorded (RFC 3339).
    pub created_at: String,
}

/// A record about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    /// Hotel the booking belongs to.
    pub hotel_id: HotelId,
    /// Booking being changed.
    pub booking_id: BookingId,
    /// Kind of mutation.
    pub action: AuditAction,
    /// Snapshot before.
    pub old_values: Option<serde_json::Value>,
    /// Snapshot after.
    pub new_values: Option<serde_json::Value>,
    /// Principal making the change.
    pub changed_by: Option<String>,
}

const INSERT_HISTORY: &str = r"
    INSERT INTO booking_history
    (hotel_id, booking_id, action, old_values, new_values, changed_by, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

const SELECT_HISTORY_FOR_HOTEL: &str = r"
    SELECT id, hotel_id, booking_id, action, old_values, new_values, changed_by, created_at
    FROM booking_history
    WHERE hotel_id = ?
    ORDER BY id
";

const SELECT_HISTORY_FOR_BOOKING: &str = r"
    SELECT id, hotel_id, booking_id, action, old_values, new_values, changed_by, created_at
    FROM booking_history
    WHERE hotel_id = ? AND booking_id = ?
    ORDER BY id
";

/// Appends a history record and returns its id.
///
/// Intended to run inside the same transaction as the mutation it
/// describes.
///
/// # Errors
///
/// Returns an error if the snapshots cannot be encoded or the insert fails.
pub fn append(conn: &Connection, entry: &AuditEntry) -> Result<i64> {
    let old_values = entry
        .old_values
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let new_values = entry
        .new_values
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        INSERT_HISTORY,
        params![
            entry.hotel_id,
            entry.booking_id.0,
            entry.action.as_str(),
            old_values,
            new_values,
            entry.changed_by,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuditRecord> {
    let action: String = row.get(3)?;
    let old_values: Option<String> = row.get(4)?;
    let new_values: Option<String> = row.get(5)?;

    let decode = |idx: usize, raw: Option<String>| -> rusqlite::Result<Option<serde_json::Value>> {
        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
            })
    };

    Ok(AuditRecord {
        id: row.get(0)?,
        hotel_id: row.get(1)?,
        booking_id: BookingId(row.get(2)?),
        action: action.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
        old_values: decode(4, old_values)?,
        new_values: decode(5, new_values)?,
        changed_by: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Lists history for a hotel, optionally narrowed to one booking, oldest
/// first.
///
/// Works for hotels that have since been deleted.
///
/// # Errors
///
/// Returns an error if the query fails or a stored snapshot is not valid JSON.
pub fn list(
    conn: &Connection,
    hotel_id: HotelId,
    booking_id: Option<BookingId>,
) -> Result<Vec<AuditRecord>> {
    let records = match booking_id {
        Some(booking_id) => {
            let mut stmt = conn.prepare(SELECT_HISTORY_FOR_BOOKING)?;
            let rows = stmt.query_map(params![hotel_id, booking_id.0], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
        None => {
            let mut stmt = conn.prepare(SELECT_HISTORY_FOR_HOTEL)?;
            let rows = stmt.query_map(params![hotel_id], row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
    };
    Ok(records)
}

/// Returns the most recent record for a booking, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn latest(
    conn: &Connection,
    hotel_id: HotelId,
    booking_id: BookingId,
) -> Result<Option<AuditRecord>> {
    let record = conn
        .query_row(
            r"SELECT id, hotel_id, booking_id, action, old_values, new_values, changed_by, created_at
              FROM booking_history
              WHERE hotel_id = ? AND booking_id = ?
              ORDER BY id DESC LIMIT 1",
            params![hotel_id, booking_id.0],
            row_to_record,
        )
        .optional()?;
    Ok(record)
}
