//! Shared database test utilities.

use std::path::PathBuf;

use innkeep::operations::{add_room, create_hotel};
use innkeep::{Database, DatabaseConfig, HotelId, Money, NewHotel, NewRoom, RoomId};

use super::admin;

/// Creates a temporary test database that will be cleaned up when dropped.
///
/// Returns the database instance. The temporary directory is tied to the
/// database's lifetime through the test.
#[allow(dead_code)]
pub fn create_test_database() -> Database {
    let (_, db) = create_test_database_at();
    db
}

/// Like [`create_test_database`], but also returns the file path so a
/// test can open further connections to the same database.
#[allow(dead_code)]
pub fn create_test_database_at() -> (PathBuf, Database) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(&path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    (path, db)
}

/// Provisions a hotel with its dynamic tables and one room per entry of
/// `rooms` (room number, nightly price in major units).
#[allow(dead_code)]
pub fn provision_hotel(
    db: &mut Database,
    name: &str,
    rooms: &[(&str, i64)],
) -> (HotelId, Vec<RoomId>) {
    let ctx = admin();
    let hotel = create_hotel(db, &ctx, &NewHotel::named(name)).unwrap().hotel.id;
    let room_ids = rooms
        .iter()
        .map(|(number, price)| {
            add_room(db, &ctx, hotel, &NewRoom::new(*number, Money::from_major(*price)))
                .unwrap()
                .id
        })
        .collect();
    (hotel, room_ids)
}

/// Counts rows in `table` matching the SQL condition `filter`.
#[allow(dead_code)]
pub fn count_rows(db: &Database, table: &str, filter: &str) -> i64 {
    db.connection()
        .query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE {filter}"),
            [],
            |row| row.get(0),
        )
        .unwrap()
}
