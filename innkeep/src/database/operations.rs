//! Row-level reads and writes.
//!
//! Static tables (hotels, users, manager assignments) have fixed columns
//! and use constant SQL. The per-hotel dynamic tables are read through a
//! select list built from their discovered column set, so rows from older
//! layouts decode with missing optional fields as `None`.

use chrono::{NaiveDate, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::booking::{
    parse_time, BookingId, BookingStatus, BookingSummary, ConflictingBooking, StayInterval,
    DATE_FORMAT,
};
use crate::context::{Role, UserAccount};
use crate::error::Result;
use crate::room::{Room, RoomId, RoomStatus};
use crate::{Hotel, HotelId, Money, NewHotel};

use super::connection::Database;
use super::tenant_tables::{column_or_null, quote_identifier, table_columns, TenantTables};

const SELECT_HOTEL: &str = r"
    SELECT id, name, address, phone, email, owner_id, created_at
    FROM hotels
    WHERE id = ?
";

const LIST_HOTELS: &str = r"
    SELECT id, name, address, phone, email, owner_id, created_at
    FROM hotels
    ORDER BY id
";

const INSERT_HOTEL: &str = r"
    INSERT INTO hotels (name, address, phone, email, owner_id, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

const INSERT_USER: &str = r"
    INSERT INTO users (username, role, hotel_id, created_at)
    VALUES (?, ?, ?, ?)
";

const SELECT_USER: &str = r"
    SELECT id, username, role, hotel_id
    FROM users
    WHERE username = ?
";

const INSERT_MANAGER: &str = r"
    INSERT OR IGNORE INTO hotel_managers (hotel_id, user_id, assigned_at)
    VALUES (?, ?, ?)
";

const ATTACH_USER: &str = "UPDATE users SET hotel_id = ? WHERE id = ?";

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

/// A conversion failure for the named column of `row`.
fn column_error(
    row: &Row<'_>,
    column: &str,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    let index = row.as_ref().column_index(column).unwrap_or_default();
    conversion_error(index, err)
}

/// A stored value that cannot be read as an amount.
#[derive(Debug)]
struct InvalidAmount(String);

impl std::fmt::Display for InvalidAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid stored amount: {}", self.0)
    }
}

impl std::error::Error for InvalidAmount {}

fn row_to_hotel(row: &Row<'_>) -> rusqlite::Result<Hotel> {
    let id: i64 = row.get(0)?;
    Ok(Hotel {
        id: HotelId::try_from(id).map_err(|e| conversion_error(0, e))?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        owner_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<UserAccount> {
    let role: String = row.get(2)?;
    Ok(UserAccount {
        id: row.get(0)?,
        username: row.get(1)?,
        role: role.parse::<Role>().map_err(|e| conversion_error(2, e))?,
        hotel_id: row.get(3)?,
    })
}

fn parse_stored_date(row: &Row<'_>, column: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(column)?;
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| column_error(row, column, e))
}

/// Layout v1 stores integer minor units; older tables may hold decimal
/// major units as REAL or TEXT.
///
/// A missing, unparseable or binary price is an error: it must never be
/// read as a free room.
fn stored_money(row: &Row<'_>, column: &str) -> rusqlite::Result<Money> {
    let invalid = |what: String| column_error(row, column, InvalidAmount(what));
    match row.get::<_, Value>(column)? {
        Value::Integer(minor) => Ok(Money::from_minor(minor)),
        Value::Real(major) => {
            Money::from_decimal(major).ok_or_else(|| invalid(major.to_string()))
        }
        Value::Text(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Money::from_decimal)
            .ok_or_else(|| invalid(format!("'{text}'"))),
        Value::Null => Err(invalid("NULL".to_string())),
        Value::Blob(_) => Err(invalid("BLOB".to_string())),
    }
}

fn row_to_room(row: &Row<'_>) -> rusqlite::Result<Room> {
    let id: i64 = row.get("id")?;
    let room_number: Option<String> = row.get("room_number")?;
    let status: Option<String> = row.get("status")?;
    Ok(Room {
        id: RoomId(id),
        room_number: room_number.unwrap_or_else(|| id.to_string()),
        category: row.get("category")?,
        price: stored_money(row, "price")?,
        description: row.get("description")?,
        status: match status {
            Some(s) => s
                .parse::<RoomStatus>()
                .map_err(|e| column_error(row, "status", e))?,
            None => RoomStatus::Available,
        },
    })
}

fn room_select(tables: &TenantTables, conn: &Connection) -> Result<Option<String>> {
    let columns = table_columns(conn, tables.rooms())?;
    if columns.is_empty() {
        return Ok(None);
    }
    let mut select = vec![quote_identifier("id")?];
    for column in ["room_number", "category", "price", "description", "status"] {
        select.push(column_or_null(&columns, column)?);
    }
    Ok(Some(format!(
        "SELECT {} FROM {}",
        select.join(", "),
        quote_identifier(tables.rooms())?
    )))
}

impl Database {
    /// Returns true if a hotel row with this id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn hotel_exists(conn: &Connection, hotel_id: HotelId) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM hotels WHERE id = ?",
            [hotel_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Loads a hotel.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_hotel(conn: &Connection, hotel_id: HotelId) -> Result<Option<Hotel>> {
        Ok(conn
            .query_row(SELECT_HOTEL, [hotel_id], row_to_hotel)
            .optional()?)
    }

    /// Lists all hotels ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_hotels(conn: &Connection) -> Result<Vec<Hotel>> {
        let mut stmt = conn.prepare(LIST_HOTELS)?;
        let hotels = stmt
            .query_map([], row_to_hotel)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hotels)
    }

    /// Inserts a hotel row and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_hotel(conn: &Connection, hotel: &NewHotel) -> Result<HotelId> {
        conn.execute(
            INSERT_HOTEL,
            params![
                hotel.name.trim(),
                hotel.address,
                hotel.phone,
                hotel.email,
                hotel.owner_id,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(HotelId::try_from(conn.last_insert_rowid())?)
    }

    /// Inserts a user and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, e.g. on a duplicate username.
    pub fn insert_user(
        conn: &Connection,
        username: &str,
        role: Role,
        hotel_id: Option<HotelId>,
    ) -> Result<i64> {
        conn.execute(
            INSERT_USER,
            params![username, role.to_string(), hotel_id, Utc::now().to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Looks a user up by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_user(conn: &Connection, username: &str) -> Result<Option<UserAccount>> {
        Ok(conn
            .query_row(SELECT_USER, [username], row_to_user)
            .optional()?)
    }

    /// Records a manager assignment and attaches the user to the hotel.
    ///
    /// Assigning the same manager twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails.
    pub fn assign_manager(conn: &Connection, hotel_id: HotelId, user_id: i64) -> Result<()> {
        conn.execute(
            INSERT_MANAGER,
            params![hotel_id, user_id, Utc::now().to_rfc3339()],
        )?;
        conn.execute(ATTACH_USER, params![hotel_id, user_id])?;
        Ok(())
    }

    /// Loads one room from a hotel's rooms table.
    ///
    /// A missing table reads as a missing room.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value is malformed.
    pub fn get_room(
        conn: &Connection,
        tables: &TenantTables,
        room_id: RoomId,
    ) -> Result<Option<Room>> {
        let Some(select) = room_select(tables, conn)? else {
            return Ok(None);
        };
        Ok(conn
            .query_row(&format!("{select} WHERE id = ?"), [room_id], row_to_room)
            .optional()?)
    }

    /// Lists every room of a hotel ordered by id; empty if the table is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value is malformed.
    pub fn list_rooms(conn: &Connection, tables: &TenantTables) -> Result<Vec<Room>> {
        let Some(select) = room_select(tables, conn)? else {
            return Ok(Vec::new());
        };
        let mut stmt = conn.prepare(&format!("{select} ORDER BY id"))?;
        let rooms = stmt
            .query_map([], row_to_room)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rooms)
    }

    /// Returns the bookings of `room_id` that currently hold the room.
    ///
    /// Tables without a `status` column predate cancellation, so every row
    /// in them holds its room. A missing table yields no bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored date is malformed.
    pub fn holding_bookings(
        conn: &Connection,
        tables: &TenantTables,
        room_id: RoomId,
    ) -> Result<Vec<ConflictingBooking>> {
        let columns = table_columns(conn, tables.bookings())?;
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let holding = BookingStatus::HOLDING
            .iter()
            .map(|s| format!("'{}'", s.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let status_filter = if columns.contains("status") {
            format!(" AND status IN ({holding})")
        } else {
            String::new()
        };

        let sql = format!(
            "SELECT id, checkin_date, checkout_date, {}, {} FROM {} WHERE room_id = ?{status_filter} ORDER BY checkin_date",
            column_or_null(&columns, "checkout_time")?,
            column_or_null(&columns, "guest_name")?,
            quote_identifier(tables.bookings())?,
        );

        let mut stmt = conn.prepare(&sql)?;
        let bookings = stmt
            .query_map([room_id], |row| {
                let checkout_time: Option<String> = row.get("checkout_time")?;
                Ok(ConflictingBooking {
                    booking_id: BookingId(row.get("id")?),
                    guest_name: row.get("guest_name")?,
                    checkin_date: parse_stored_date(row, "checkin_date")?,
                    checkout_date: parse_stored_date(row, "checkout_date")?,
                    checkout_time: checkout_time.as_deref().and_then(parse_time),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(bookings)
    }

    /// Loads one booking from a hotel's bookings table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value is malformed.
    pub fn get_booking(
        conn: &Connection,
        tables: &TenantTables,
        booking_id: BookingId,
    ) -> Result<Option<BookingSummary>> {
        let columns = table_columns(conn, tables.bookings())?;
        if columns.is_empty() {
            return Ok(None);
        }

        let sql = format!(
            "SELECT id, room_id, checkin_date, checkout_date, {}, {}, {}, {} FROM {} WHERE id = ?",
            column_or_null(&columns, "checkin_time")?,
            column_or_null(&columns, "checkout_time")?,
            column_or_null(&columns, "guest_name")?,
            column_or_null(&columns, "status")?,
            quote_identifier(tables.bookings())?,
        );

        Ok(conn
            .query_row(&sql, [booking_id.0], |row| {
                let checkin_time: Option<String> = row.get("checkin_time")?;
                let checkout_time: Option<String> = row.get("checkout_time")?;
                let status: Option<String> = row.get("status")?;
                let stay = StayInterval::from_stored(
                    parse_stored_date(row, "checkin_date")?,
                    parse_stored_date(row, "checkout_date")?,
                    checkout_time.as_deref().and_then(parse_time),
                )
                .with_checkin_time(checkin_time.as_deref().and_then(parse_time));
                Ok(BookingSummary {
                    id: BookingId(row.get("id")?),
                    room_id: RoomId(row.get("room_id")?),
                    guest_name: row.get("guest_name")?,
                    stay,
                    status: match status {
                        Some(s) => s
                            .parse::<BookingStatus>()
                            .map_err(|e| column_error(row, "status", e))?,
                        None => BookingStatus::Active,
                    },
                })
            })
            .optional()?)
    }
}
