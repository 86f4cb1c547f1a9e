//! Database schema management and migrations.
//!
//! This module handles database schema initialization and version checking
//! for the static tables. Per-hotel tables are provisioned separately.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION, STATIC_INDICES,
    STATIC_TABLES,
};

/// Initializes the database schema.
///
/// Creates all static tables, indices, and the version record in one
/// transaction.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use innkeep::database::migrations::initialize_schema;
///
/// let mut conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&mut conn).unwrap();
/// ```
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    for statement in STATIC_TABLES {
        tx.execute(statement, [])?;
    }
    for statement in STATIC_INDICES {
        tx.execute(statement, [])?;
    }
    tx.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION.to_string()])?;
    tx.commit()?;
    log::debug!("initialized schema version {CURRENT_SCHEMA_VERSION}");
    Ok(())
}

/// Gets the current schema version from the database.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than a missing
/// metadata table or row (which indicate version 0).
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => {
            // "no such table: metadata" surfaces as a generic SQLite error
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// # Errors
///
/// Returns an error if the stored version differs from
/// [`CURRENT_SCHEMA_VERSION`] or initialization fails.
pub fn check_schema_compatibility(conn: &mut Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}
