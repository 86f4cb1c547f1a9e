//! Database schema definitions and SQL constants.
//!
//! This module contains the static (tenant-independent) table definitions.
//! The per-hotel dynamic tables are defined in
//! [`tenant_tables`](super::tenant_tables) because their names are derived
//! at runtime.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application. Version 1 also
/// fixes the layout of newly provisioned per-hotel tables.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Hotels (tenants).
pub const CREATE_HOTELS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS hotels (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT,
        phone TEXT,
        email TEXT,
        owner_id INTEGER,
        created_at TEXT NOT NULL
    )";

/// User accounts. `hotel_id` is nulled, not deleted, on hotel teardown.
pub const CREATE_USERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        hotel_id INTEGER REFERENCES hotels(id),
        created_at TEXT NOT NULL
    )";

/// Manager-to-hotel assignments.
pub const CREATE_HOTEL_MANAGERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS hotel_managers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        hotel_id INTEGER NOT NULL REFERENCES hotels(id),
        user_id INTEGER NOT NULL REFERENCES users(id),
        assigned_at TEXT NOT NULL,
        UNIQUE (hotel_id, user_id)
    )";

/// Room category definitions per hotel.
pub const CREATE_ROOM_CATEGORIES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS room_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        hotel_id INTEGER NOT NULL REFERENCES hotels(id),
        name TEXT NOT NULL,
        description TEXT,
        base_price INTEGER NOT NULL DEFAULT 0
    )";

/// Revenue ledger.
pub const CREATE_REVENUE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS revenue (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        hotel_id INTEGER NOT NULL REFERENCES hotels(id),
        booking_ref TEXT,
        amount INTEGER NOT NULL,
        recorded_at TEXT NOT NULL
    )";

/// Static rooms store shared by all hotels.
pub const CREATE_STATIC_ROOMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS rooms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        hotel_id INTEGER NOT NULL REFERENCES hotels(id),
        room_number TEXT NOT NULL,
        category TEXT,
        price INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'available',
        UNIQUE (hotel_id, room_number)
    )";

/// Guests. One row per booking; never deduplicated.
pub const CREATE_GUESTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS guests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        email TEXT,
        nid TEXT,
        address TEXT,
        created_at TEXT NOT NULL
    )";

/// Static bookings store shared by all hotels.
pub const CREATE_STATIC_BOOKINGS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS bookings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        guest_id INTEGER REFERENCES guests(id),
        checkin_date TEXT NOT NULL,
        checkout_date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'active',
        created_at TEXT NOT NULL
    )";

/// Append-only booking history. No foreign key to `hotels`: records
/// outlive the hotel.
pub const CREATE_BOOKING_HISTORY_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS booking_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        hotel_id INTEGER NOT NULL,
        booking_id INTEGER NOT NULL,
        action TEXT NOT NULL CHECK (action IN ('created', 'updated', 'deleted')),
        old_values TEXT,
        new_values TEXT,
        changed_by TEXT,
        created_at TEXT NOT NULL
    )";

/// Index for history lookups.
pub const CREATE_HISTORY_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_booking_history_hotel_booking ON booking_history(hotel_id, booking_id)";

/// Index for static room lookups by hotel.
pub const CREATE_STATIC_ROOMS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_rooms_hotel ON rooms(hotel_id)";

/// Index for static booking lookups by room.
pub const CREATE_STATIC_BOOKINGS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bookings_room ON bookings(room_id)";

/// Index for detaching users by hotel.
pub const CREATE_USERS_HOTEL_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_users_hotel ON users(hotel_id)";

/// All static tables, in creation order.
pub const STATIC_TABLES: [&str; 10] = [
    CREATE_METADATA_TABLE,
    CREATE_HOTELS_TABLE,
    CREATE_USERS_TABLE,
    CREATE_HOTEL_MANAGERS_TABLE,
    CREATE_ROOM_CATEGORIES_TABLE,
    CREATE_REVENUE_TABLE,
    CREATE_STATIC_ROOMS_TABLE,
    CREATE_GUESTS_TABLE,
    CREATE_STATIC_BOOKINGS_TABLE,
    CREATE_BOOKING_HISTORY_TABLE,
];

/// All static indices.
pub const STATIC_INDICES: [&str; 4] = [
    CREATE_HISTORY_INDEX,
    CREATE_STATIC_ROOMS_INDEX,
    CREATE_STATIC_BOOKINGS_INDEX,
    CREATE_USERS_HOTEL_INDEX,
];

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
