//! Database layer.
//!
//! A single `SQLite` file holds the static tables shared by every hotel and
//! one pair of dynamic tables per hotel. This module owns connection setup,
//! schema versioning, write transactions, and row access.
//!
//! # Examples
//!
//! ```no_run
//! use innkeep::database::{Database, DatabaseConfig};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
//! for hotel in Database::list_hotels(db.connection()).unwrap() {
//!     println!("{} {}", hotel.id, hotel.name);
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
pub mod tenant_tables;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
pub use schema::CURRENT_SCHEMA_VERSION;
pub use tenant_tables::{
    create_tenant_tables, probe, quote_identifier, require_table, table_columns, table_exists,
    TablePresence, TenantTables, TENANT_LAYOUT_VERSION,
};
