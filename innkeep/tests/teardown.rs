//! Hotel teardown tests.
//!
//! A teardown removes every static row tied to the hotel, drops both of
//! its dynamic tables, and deletes the hotel row, all in one transaction.
//! These tests check the complete footprint on success and that any
//! failing step leaves the database exactly as it was.

mod common;

use chrono::Days;

use common::database::{count_rows, create_test_database, provision_hotel};
use common::{admin, june, BookingFixture};
use innkeep::operations::{
    assign_manager, create_booking, create_user, delete_hotel, teardown, TeardownOptions,
};
use innkeep::{Database, Error, HotelId, Role, TenantTables};

fn static_rows(db: &Database, hotel: HotelId) -> i64 {
    let id = hotel.value();
    count_rows(db, "rooms", &format!("hotel_id = {id}"))
        + count_rows(
            db,
            "bookings",
            &format!("room_id IN (SELECT id FROM rooms WHERE hotel_id = {id})"),
        )
        + count_rows(db, "room_categories", &format!("hotel_id = {id}"))
        + count_rows(db, "revenue", &format!("hotel_id = {id}"))
        + count_rows(db, "hotel_managers", &format!("hotel_id = {id}"))
}

fn table_exists(db: &Database, name: &str) -> bool {
    innkeep::database::table_exists(db.connection(), name).unwrap()
}

/// Builds the scenario hotel: five rooms, twelve bookings, and one row in
/// each static table that hangs off the hotel.
fn populated_hotel(db: &mut Database) -> HotelId {
    let (hotel, rooms) = provision_hotel(
        db,
        "Grand Budapest",
        &[("101", 800), ("102", 800), ("103", 900), ("201", 1200), ("202", 1500)],
    );

    let ctx = admin();
    for i in 0..12u64 {
        let room = rooms[usize::try_from(i).unwrap() % rooms.len()];
        let checkin = june(1) + Days::new(i * 3);
        let request = BookingFixture::new(hotel, room)
            .stay(checkin, checkin + Days::new(2))
            .guest(&format!("Guest {i}"))
            .build();
        create_booking(db, &ctx, &request).unwrap();
    }

    let manager = create_user(db, &ctx, "zero", Role::Manager, None).unwrap();
    assign_manager(db, &ctx, hotel, &manager.username).unwrap();

    let id = hotel.value();
    db.connection()
        .execute_batch(&format!(
            "INSERT INTO rooms (hotel_id, room_number) VALUES ({id}, 'S1');
             INSERT INTO bookings (room_id, checkin_date, checkout_date, created_at)
                 VALUES (last_insert_rowid(), '2024-06-01', '2024-06-02', datetime('now'));
             INSERT INTO room_categories (hotel_id, name) VALUES ({id}, 'Suite');
             INSERT INTO revenue (hotel_id, amount, recorded_at) VALUES ({id}, 1000, datetime('now'));"
        ))
        .unwrap();
    hotel
}

/// Deleting a hotel with five rooms and twelve bookings reports its name,
/// drops both dynamic tables, and removes every dependent static row.
/// Users are detached, not deleted, and booking history survives.
#[test]
fn test_delete_populated_hotel() {
    let mut db = create_test_database();
    let hotel = populated_hotel(&mut db);
    let tables = TenantTables::for_hotel(hotel);
    assert_eq!(count_rows(&db, tables.bookings(), "1 = 1"), 12);
    assert_eq!(static_rows(&db, hotel), 5);
    let history_before = count_rows(&db, "booking_history", "1 = 1");

    let result = delete_hotel(&mut db, &admin(), hotel).unwrap();

    assert!(!result.dry_run);
    assert_eq!(result.hotel_name, "Grand Budapest");
    assert!(result.message().contains("Grand Budapest"));
    assert_eq!(result.dependent_rows, 5);
    assert_eq!(
        result.dropped_tables,
        vec![tables.rooms().to_string(), tables.bookings().to_string()]
    );

    assert!(!Database::hotel_exists(db.connection(), hotel).unwrap());
    assert!(!table_exists(&db, tables.rooms()));
    assert!(!table_exists(&db, tables.bookings()));
    assert_eq!(static_rows(&db, hotel), 0);

    let user = Database::find_user(db.connection(), "zero").unwrap().unwrap();
    assert_eq!(user.hotel_id, None);
    assert_eq!(count_rows(&db, "booking_history", "1 = 1"), history_before);
}

/// Only the targeted hotel's footprint goes; a neighbour keeps its tables
/// and rows.
#[test]
fn test_delete_leaves_other_hotels_alone() {
    let mut db = create_test_database();
    let doomed = populated_hotel(&mut db);
    let (survivor, rooms) = provision_hotel(&mut db, "Survivor Inn", &[("1", 100)]);
    create_booking(&mut db, &admin(), &BookingFixture::new(survivor, rooms[0]).build()).unwrap();

    delete_hotel(&mut db, &admin(), doomed).unwrap();

    let tables = TenantTables::for_hotel(survivor);
    assert!(Database::hotel_exists(db.connection(), survivor).unwrap());
    assert!(table_exists(&db, tables.rooms()));
    assert_eq!(count_rows(&db, tables.bookings(), "1 = 1"), 1);
}

/// A missing hotel is reported as not found and no write transaction is
/// started, so the history is untouched.
#[test]
fn test_delete_missing_hotel() {
    let mut db = create_test_database();
    populated_hotel(&mut db);
    let history_before = count_rows(&db, "booking_history", "1 = 1");

    let err = delete_hotel(&mut db, &admin(), HotelId::try_from(404).unwrap()).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(count_rows(&db, "booking_history", "1 = 1"), history_before);
}

#[test]
fn test_dry_run_reports_plan_without_changes() {
    let mut db = create_test_database();
    let hotel = populated_hotel(&mut db);

    let result = teardown(
        &mut db,
        &admin(),
        TeardownOptions::new(hotel).with_dry_run(true),
    )
    .unwrap();
    assert!(result.dry_run);
    assert_eq!(result.steps.len(), 9);
    assert_eq!(result.dropped_tables.len(), 2);
    assert!(result.message().starts_with("would delete"));

    assert!(Database::hotel_exists(db.connection(), hotel).unwrap());
    assert_eq!(static_rows(&db, hotel), 5);
}

/// When the final step (deleting the hotel row) is refused, the earlier
/// steps are undone: both dynamic tables come back and every static row
/// is restored.
#[test]
fn test_failing_last_step_restores_everything() {
    let mut db = create_test_database();
    let hotel = populated_hotel(&mut db);
    let tables = TenantTables::for_hotel(hotel);
    db.connection()
        .execute_batch(
            "CREATE TRIGGER keep_hotels BEFORE DELETE ON hotels
             BEGIN SELECT RAISE(ABORT, 'hotels are permanent'); END;",
        )
        .unwrap();

    let err = delete_hotel(&mut db, &admin(), hotel).unwrap_err();
    match &err {
        Error::TransactionFailure { operation, .. } => {
            assert_eq!(operation, &format!("Delete hotel {hotel}"));
        }
        other => panic!("expected transaction failure, got {other:?}"),
    }

    assert!(Database::hotel_exists(db.connection(), hotel).unwrap());
    assert!(table_exists(&db, tables.rooms()));
    assert_eq!(count_rows(&db, tables.bookings(), "1 = 1"), 12);
    assert_eq!(static_rows(&db, hotel), 5);
    let user = Database::find_user(db.connection(), "zero").unwrap().unwrap();
    assert_eq!(user.hotel_id, Some(hotel.value()));
}

/// A table outside the hotel's footprint that references its bookings
/// table blocks the drop; the static deletions that already ran are
/// rolled back.
#[test]
fn test_blocked_drop_rolls_back_static_deletes() {
    let mut db = create_test_database();
    let hotel = populated_hotel(&mut db);
    let tables = TenantTables::for_hotel(hotel);
    db.connection()
        .execute_batch(&format!(
            "CREATE TABLE invoices (
                 id INTEGER PRIMARY KEY,
                 booking_id INTEGER NOT NULL REFERENCES {bookings}(id)
             );
             INSERT INTO invoices (booking_id) SELECT MIN(id) FROM {bookings};",
            bookings = tables.bookings()
        ))
        .unwrap();

    let err = delete_hotel(&mut db, &admin(), hotel).unwrap_err();
    match &err {
        Error::TransactionFailure { operation, .. } => {
            assert!(operation.contains(tables.bookings()), "operation: {operation}");
        }
        other => panic!("expected transaction failure, got {other:?}"),
    }

    assert!(Database::hotel_exists(db.connection(), hotel).unwrap());
    assert!(table_exists(&db, tables.rooms()));
    assert!(table_exists(&db, tables.bookings()));
    assert_eq!(static_rows(&db, hotel), 5);
}

/// A hotel that lost one of its dynamic tables can still be deleted; the
/// missing table is skipped and reported.
#[test]
fn test_partial_footprint_is_deleted_with_warning() {
    let mut db = create_test_database();
    let (hotel, _) = provision_hotel(&mut db, "Half House", &[("1", 100)]);
    let tables = TenantTables::for_hotel(hotel);
    db.connection()
        .execute(&format!("DROP TABLE {}", tables.bookings()), [])
        .unwrap();

    let result = delete_hotel(&mut db, &admin(), hotel).unwrap();
    assert_eq!(result.dropped_tables, vec![tables.rooms().to_string()]);
    assert_eq!(result.warnings.len(), 1);
    assert!(!Database::hotel_exists(db.connection(), hotel).unwrap());
}
