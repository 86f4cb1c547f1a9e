//! Room availability.
//!
//! A room is free for a requested stay unless one of its holding bookings
//! conflicts with it under [`StayInterval::conflicts_with`]. The check is
//! read-only and safe to repeat; the booking path re-runs
//! [`find_conflicts`] after taking the write lock.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::booking::{ConflictingBooking, StayInterval};
use crate::database::{table_exists, Database, TenantTables};
use crate::error::{Error, Result};
use crate::room::RoomId;
use crate::HotelId;

/// Outcome of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    /// True when nothing blocks the requested stay.
    pub available: bool,
    /// The bookings that block it, oldest check-in first.
    pub conflicts: Vec<ConflictingBooking>,
}

impl AvailabilityReport {
    fn from_conflicts(conflicts: Vec<ConflictingBooking>) -> Self {
        Self {
            available: conflicts.is_empty(),
            conflicts,
        }
    }
}

/// Returns the holding bookings of `room_id` that block `requested`.
///
/// A missing bookings table yields no conflicts.
///
/// # Errors
///
/// Returns an error if the bookings table cannot be read.
pub fn find_conflicts(
    conn: &Connection,
    tables: &TenantTables,
    room_id: RoomId,
    requested: &StayInterval,
) -> Result<Vec<ConflictingBooking>> {
    let conflicts = Database::holding_bookings(conn, tables, room_id)?
        .into_iter()
        .filter(|existing| {
            StayInterval::from_stored(
                existing.checkin_date,
                existing.checkout_date,
                existing.checkout_time,
            )
            .conflicts_with(requested)
        })
        .collect();
    Ok(conflicts)
}

/// Checks whether a room is free between two dates.
///
/// # Errors
///
/// - [`Error::Validation`] if `checkout` is not after `checkin`
/// - [`Error::NotFound`] if the hotel or the room does not exist (a
///   missing rooms table counts as a missing room)
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use innkeep::operations::is_available;
/// use innkeep::{Database, DatabaseConfig, HotelId, RoomId};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
/// let d = |day| NaiveDate::from_ymd_opt(2030, 6, day).unwrap();
/// let report = is_available(
///     db.connection(),
///     HotelId::try_from(1).unwrap(),
///     RoomId(1),
///     d(1),
///     d(3),
/// )
/// .unwrap();
/// println!("available: {}", report.available);
/// ```
pub fn is_available(
    conn: &Connection,
    hotel_id: HotelId,
    room_id: RoomId,
    checkin: NaiveDate,
    checkout: NaiveDate,
) -> Result<AvailabilityReport> {
    let requested = StayInterval::new(checkin, checkout)?;

    if !Database::hotel_exists(conn, hotel_id)? {
        return Err(Error::not_found(format!("hotel {hotel_id}")));
    }

    let tables = TenantTables::for_hotel(hotel_id);
    if Database::get_room(conn, &tables, room_id)?.is_none() {
        return Err(Error::not_found(format!("room {room_id} in hotel {hotel_id}")));
    }

    if !table_exists(conn, tables.bookings())? {
        log::warn!(
            "{} is missing; treating room {room_id} as free",
            tables.bookings()
        );
        return Ok(AvailabilityReport::from_conflicts(Vec::new()));
    }

    let report =
        AvailabilityReport::from_conflicts(find_conflicts(conn, &tables, room_id, &requested)?);
    log::debug!(
        "room {room_id} in hotel {hotel_id} {checkin}..{checkout}: {} conflict(s)",
        report.conflicts.len()
    );
    Ok(report)
}
