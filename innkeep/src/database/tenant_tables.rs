//! Per-hotel dynamic tables.
//!
//! Each hotel owns a rooms table and a bookings table whose names are
//! derived from its [`HotelId`]. Identifiers are only ever built from a
//! validated id, checked against an allow-list, and double-quoted before
//! they reach SQL. Values always travel as bound parameters.
//!
//! Tables created by older releases may lack some columns, so readers and
//! writers discover the physical column set at runtime and map their
//! logical fields onto whatever is present.

use std::collections::BTreeSet;

use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::HotelId;

/// Layout version of the dynamic tables created by
/// [`create_tenant_tables`].
pub const TENANT_LAYOUT_VERSION: i32 = 1;

/// The names of one hotel's dynamic tables.
///
/// # Examples
///
/// ```
/// use innkeep::HotelId;
/// use innkeep::database::TenantTables;
///
/// let tables = TenantTables::for_hotel(HotelId::try_from(12).unwrap());
/// assert_eq!(tables.rooms(), "rooms_hotel_12");
/// assert_eq!(tables.bookings(), "bookings_hotel_12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantTables {
    hotel_id: HotelId,
    rooms: String,
    bookings: String,
}

impl TenantTables {
    /// Derives the table names for a hotel. No I/O.
    #[must_use]
    pub fn for_hotel(hotel_id: HotelId) -> Self {
        Self {
            hotel_id,
            rooms: format!("rooms_hotel_{hotel_id}"),
            bookings: format!("bookings_hotel_{hotel_id}"),
        }
    }

    /// The hotel these tables belong to.
    #[must_use]
    pub const fn hotel_id(&self) -> HotelId {
        self.hotel_id
    }

    /// Name of the rooms table.
    #[must_use]
    pub fn rooms(&self) -> &str {
        &self.rooms
    }

    /// Name of the bookings table.
    #[must_use]
    pub fn bookings(&self) -> &str {
        &self.bookings
    }
}

/// Which of a hotel's dynamic tables are physically present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePresence {
    /// Rooms table exists.
    pub rooms: bool,
    /// Bookings table exists.
    pub bookings: bool,
}

impl TablePresence {
    /// Returns true when exactly one of the pair exists.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.rooms != self.bookings
    }
}

/// Checks `name` against the identifier allow-list and returns it quoted.
///
/// Accepted identifiers are non-empty, made of `[a-z0-9_]`, and do not
/// start with a digit.
///
/// # Errors
///
/// Returns a validation error for anything else.
///
/// # Examples
///
/// ```
/// use innkeep::database::quote_identifier;
///
/// assert_eq!(quote_identifier("rooms_hotel_3").unwrap(), "\"rooms_hotel_3\"");
/// assert!(quote_identifier("rooms; DROP TABLE hotels").is_err());
/// ```
pub fn quote_identifier(name: &str) -> Result<String> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(format!("\"{name}\""))
    } else {
        Err(Error::validation(
            "identifier",
            format!("'{name}' is not an acceptable table or column name"),
        ))
    }
}

/// Returns true if a table named `name` exists.
///
/// # Errors
///
/// Returns an error only if the catalog query itself fails.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Returns the physical column names of `name`; empty if the table is
/// missing.
///
/// # Errors
///
/// Returns an error if the catalog query fails.
pub fn table_columns(conn: &Connection, name: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?)")?;
    let columns = stmt
        .query_map([name], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<BTreeSet<_>>>()?;
    Ok(columns)
}

/// Probes which of a hotel's dynamic tables exist.
///
/// # Errors
///
/// Returns an error if the catalog query fails.
pub fn probe(conn: &Connection, tables: &TenantTables) -> Result<TablePresence> {
    Ok(TablePresence {
        rooms: table_exists(conn, tables.rooms())?,
        bookings: table_exists(conn, tables.bookings())?,
    })
}

/// Returns the column set of a table a write path depends on.
///
/// # Errors
///
/// Returns [`Error::SchemaInconsistency`] if the table is missing.
pub fn require_table(conn: &Connection, name: &str) -> Result<BTreeSet<String>> {
    let columns = table_columns(conn, name)?;
    if columns.is_empty() {
        return Err(Error::SchemaInconsistency {
            table: name.to_string(),
            details: "table does not exist".into(),
        });
    }
    Ok(columns)
}

/// Select-list expression for an optional column: the quoted column when
/// present, `NULL` otherwise. The result keeps the column's name so rows
/// can be read by name either way.
pub(crate) fn column_or_null(columns: &BTreeSet<String>, name: &str) -> Result<String> {
    let quoted = quote_identifier(name)?;
    if columns.contains(name) {
        Ok(quoted)
    } else {
        Ok(format!("NULL AS {quoted}"))
    }
}

/// Creates both dynamic tables for `hotel_id` with the current layout.
///
/// Existing tables are left untouched.
///
/// # Errors
///
/// Returns an error if either statement fails.
pub fn create_tenant_tables(conn: &Connection, hotel_id: HotelId) -> Result<TenantTables> {
    let tables = TenantTables::for_hotel(hotel_id);
    let rooms = quote_identifier(tables.rooms())?;
    let bookings = quote_identifier(tables.bookings())?;
    let index = quote_identifier(&format!("idx_{}_room_status", tables.bookings()))?;

    conn.execute_batch(&format!(
        r"
        CREATE TABLE IF NOT EXISTS {rooms} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            room_number TEXT NOT NULL UNIQUE,
            category TEXT,
            price INTEGER NOT NULL DEFAULT 0,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'available'
        );
        CREATE TABLE IF NOT EXISTS {bookings} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            room_id INTEGER NOT NULL,
            guest_id INTEGER,
            guest_name TEXT,
            guest_phone TEXT,
            guest_email TEXT,
            guest_nid TEXT,
            guest_address TEXT,
            checkin_date TEXT NOT NULL,
            checkin_time TEXT,
            checkout_date TEXT NOT NULL,
            checkout_time TEXT,
            nights INTEGER,
            room_price INTEGER,
            room_total INTEGER,
            breakfast_price INTEGER,
            breakfast_qty INTEGER,
            breakfast_total INTEGER,
            lunch_price INTEGER,
            lunch_qty INTEGER,
            lunch_total INTEGER,
            dinner_price INTEGER,
            dinner_qty INTEGER,
            dinner_total INTEGER,
            meal_total INTEGER,
            discount INTEGER,
            amount_due INTEGER,
            paid INTEGER,
            due INTEGER,
            status TEXT NOT NULL DEFAULT 'active',
            reference TEXT,
            notes TEXT,
            created_by TEXT,
            created_at TEXT,
            updated_at TEXT
        );
        CREATE INDEX IF NOT EXISTS {index} ON {bookings}(room_id, status);
        "
    ))?;

    log::debug!(
        "provisioned {} and {} (layout v{TENANT_LAYOUT_VERSION})",
        tables.rooms(),
        tables.bookings()
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_test_database;

    fn hotel(id: i64) -> HotelId {
        HotelId::try_from(id).unwrap()
    }

    #[test]
    fn test_quote_identifier_allow_list() {
        assert!(quote_identifier("bookings_hotel_1").is_ok());
        assert!(quote_identifier("_private").is_ok());
        assert!(quote_identifier("").is_err());
        assert!(quote_identifier("1rooms").is_err());
        assert!(quote_identifier("Rooms").is_err());
        assert!(quote_identifier("rooms\"; --").is_err());
    }

    #[test]
    fn test_missing_table_is_not_an_error() {
        let db = create_test_database();
        assert!(!table_exists(db.connection(), "rooms_hotel_404").unwrap());
        assert!(table_columns(db.connection(), "rooms_hotel_404")
            .unwrap()
            .is_empty());
        let err = require_table(db.connection(), "rooms_hotel_404").unwrap_err();
        assert!(matches!(err, Error::SchemaInconsistency { .. }));
    }

    #[test]
    fn test_create_and_probe() {
        let db = create_test_database();
        let tables = create_tenant_tables(db.connection(), hotel(5)).unwrap();
        let presence = probe(db.connection(), &tables).unwrap();
        assert!(presence.rooms && presence.bookings);
        assert!(!presence.is_partial());

        let columns = table_columns(db.connection(), tables.bookings()).unwrap();
        for column in ["room_id", "checkin_date", "checkout_date", "status", "checkout_time"] {
            assert!(columns.contains(column), "missing {column}");
        }

        // Idempotent
        create_tenant_tables(db.connection(), hotel(5)).unwrap();
    }

    #[test]
    fn test_column_or_null() {
        let columns: BTreeSet<String> = ["status".to_string()].into_iter().collect();
        assert_eq!(column_or_null(&columns, "status").unwrap(), "\"status\"");
        assert_eq!(
            column_or_null(&columns, "checkout_time").unwrap(),
            "NULL AS \"checkout_time\""
        );
    }
}
