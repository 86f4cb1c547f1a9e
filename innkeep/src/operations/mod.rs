//! Booking-consistency operations.
//!
//! Every operation takes an explicit [`RequestContext`](crate::RequestContext)
//! and performs its own authorization. Multi-step writes run inside one
//! immediate transaction opened by [`Database::write`](crate::Database::write),
//! so the write lock is held before any re-check and a failure at any step
//! leaves nothing behind.
//!
//! # Architecture
//!
//! Hotel teardown follows a plan-then-execute split:
//! 1. **Planning**: [`TeardownPlan::build`] probes the hotel's dynamic tables
//!    and lists the ordered actions
//! 2. **Execution**: [`PlanExecutor`] runs the actions on the open
//!    transaction, or only describes them in dry-run mode
//!
//! # Examples
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use innkeep::operations::{create_booking, is_available};
//! use innkeep::{
//!     BookingRequest, Database, DatabaseConfig, GuestInfo, HotelId, Principal,
//!     RequestContext, RoomId, StayInterval,
//! };
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
//! let ctx = RequestContext::new(Principal::admin("root"));
//! let hotel = HotelId::try_from(1).unwrap();
//! let d = |day| NaiveDate::from_ymd_opt(2030, 6, day).unwrap();
//!
//! let report = is_available(db.connection(), hotel, RoomId(1), d(1), d(3)).unwrap();
//! if report.available {
//!     let request = BookingRequest::new(
//!         hotel,
//!         RoomId(1),
//!         GuestInfo::new("Ada", "555-0100"),
//!         StayInterval::new(d(1), d(3)).unwrap(),
//!     );
//!     let receipt = create_booking(&mut db, &ctx, &request).unwrap();
//!     println!("{}", receipt.reference);
//! }
//! ```

pub mod availability;
pub mod booking;
pub mod executor;
pub mod init;
pub mod lifecycle;
pub mod plan;
pub mod provision;
pub mod rooms;
pub mod teardown;

#[cfg(test)]
mod proptests;

pub use availability::{find_conflicts, is_available, AvailabilityReport};
pub use booking::{booking_reference, create_booking, BookingReceipt, MANDATORY_BOOKING_COLUMNS};
pub use executor::{ExecutionResult, PlanExecutor, StepOutcome};
pub use init::{init_database, InitOptions, InitResult};
pub use lifecycle::{booking_history, transition_booking};
pub use plan::{TeardownAction, TeardownPlan};
pub use provision::{assign_manager, create_hotel, create_user, ProvisionedHotel};
pub use rooms::{add_room, list_rooms, update_room};
pub use teardown::{delete_hotel, teardown, DeletionResult, TeardownOptions};
