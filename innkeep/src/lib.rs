#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # innkeep
//!
//! A library for multi-tenant hotel room inventory and booking consistency.
//!
//! Many hotels share one `SQLite` database. Each hotel owns a pair of
//! dynamically named tables (`rooms_hotel_<id>`, `bookings_hotel_<id>`)
//! next to the static tables they all share. The library decides room
//! availability, creates bookings atomically with an append-only history,
//! and tears a hotel's whole footprint down in one transaction.
//!
//! ## Core Types
//!
//! - [`HotelId`], [`RoomId`] and [`BookingId`]: typed identifiers
//! - [`StayInterval`]: a stay and the conflict rule between stays
//! - [`BookingRequest`] and [`BookingTotals`]: booking input and charges
//! - [`RequestContext`]: the acting principal, hotel scope, and "today"
//! - [`Database`]: connection, schema, and write transactions
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime};
//! use innkeep::{HotelId, StayInterval};
//!
//! let d = |day| NaiveDate::from_ymd_opt(2030, 6, day).unwrap();
//! let existing = StayInterval::new(d(1), d(3))
//!     .unwrap()
//!     .with_checkout_time(NaiveTime::from_hms_opt(10, 0, 0));
//! let requested = StayInterval::new(d(3), d(5)).unwrap();
//!
//! // Checking out by 11:00 frees the room for a same-day arrival.
//! assert!(!existing.conflicts_with(&requested));
//! assert!(HotelId::try_from(0).is_err());
//! ```

pub mod api;
pub mod audit;
pub mod booking;
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod hotel;
pub mod logging;
pub mod money;
pub mod operations;
pub mod room;

// Re-export key types at crate root for convenience
pub use audit::{AuditAction, AuditRecord};
pub use booking::{
    BookingId, BookingRequest, BookingStatus, BookingSummary, BookingTotals, Charges,
    ConflictingBooking, GuestInfo, MealAddon, StayInterval, LATE_CHECKOUT_CUTOFF,
};
pub use config::{Config, ConfigBuilder};
pub use context::{Principal, RequestContext, Role, UserAccount};
pub use database::{Database, DatabaseConfig, TenantTables};
pub use error::{Error, ErrorKind, Result};
pub use hotel::{Hotel, HotelId, NewHotel};
pub use logging::{init_logger, LogLevel, Logger};
pub use money::Money;
pub use operations::{
    AvailabilityReport, BookingReceipt, DeletionResult, ExecutionResult, PlanExecutor,
    TeardownAction, TeardownOptions, TeardownPlan,
};
pub use room::{NewRoom, Room, RoomId, RoomStatus, RoomUpdate};
