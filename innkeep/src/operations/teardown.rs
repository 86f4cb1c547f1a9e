//! Hotel teardown.
//!
//! Removes a hotel's whole footprint (static rows that reference it, its
//! dynamic tables, and the hotel row) in one immediate transaction. Booking
//! history is kept.

use serde::Serialize;

use crate::context::RequestContext;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::HotelId;

use super::executor::{PlanExecutor, StepOutcome};
use super::plan::TeardownPlan;

/// Options for a teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownOptions {
    /// The hotel to remove.
    pub hotel_id: HotelId,
    /// Describe the plan without changing anything.
    pub dry_run: bool,
}

impl TeardownOptions {
    /// Options for removing `hotel_id`.
    #[must_use]
    pub const fn new(hotel_id: HotelId) -> Self {
        Self {
            hotel_id,
            dry_run: false,
        }
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Report of a completed (or planned) teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionResult {
    /// The hotel removed.
    pub hotel_id: HotelId,
    /// Its name.
    pub hotel_name: String,
    /// True if nothing was changed.
    pub dry_run: bool,
    /// Per-step outcomes in execution order.
    pub steps: Vec<StepOutcome>,
    /// Dynamic tables dropped.
    pub dropped_tables: Vec<String>,
    /// Rows removed from tables that depended on the hotel.
    pub dependent_rows: usize,
    /// Plan warnings, such as a half-present table pair.
    pub warnings: Vec<String>,
}

impl DeletionResult {
    /// A one-line summary for the caller.
    #[must_use]
    pub fn message(&self) -> String {
        if self.dry_run {
            format!(
                "would delete hotel '{}' in {} step(s)",
                self.hotel_name,
                self.steps.len()
            )
        } else {
            format!(
                "hotel '{}' deleted with {} dependent rows removed",
                self.hotel_name, self.dependent_rows
            )
        }
    }
}

fn not_found(hotel_id: HotelId) -> Error {
    Error::not_found(format!("hotel {hotel_id}"))
}

/// Deletes a hotel and everything that belongs to it.
///
/// Equivalent to [`teardown`] without dry run.
///
/// # Errors
///
/// See [`teardown`].
pub fn delete_hotel(
    db: &mut Database,
    ctx: &RequestContext,
    hotel_id: HotelId,
) -> Result<DeletionResult> {
    teardown(db, ctx, TeardownOptions::new(hotel_id))
}

/// Plans and (unless dry run) executes a hotel teardown.
///
/// Existence is checked before any write lock is taken and again inside the
/// transaction. The steps run in this order: static bookings of the
/// hotel's static rooms, static rooms, room categories, revenue, manager
/// assignments, user detachment, the dynamic rooms and bookings tables
/// (when present), and finally the hotel row. Any failure rolls every step
/// back, dropped tables included.
///
/// # Errors
///
/// - [`Error::Unauthorized`] unless the principal is an administrator
/// - [`Error::NotFound`] if the hotel does not exist
/// - [`Error::TransactionFailure`] naming the step that failed
/// - [`Error::LockTimeout`] if the write lock cannot be obtained
pub fn teardown(
    db: &mut Database,
    ctx: &RequestContext,
    options: TeardownOptions,
) -> Result<DeletionResult> {
    ctx.require_admin("delete hotel")?;
    let hotel_id = options.hotel_id;

    let hotel =
        Database::get_hotel(db.connection(), hotel_id)?.ok_or_else(|| not_found(hotel_id))?;

    if options.dry_run {
        let plan = TeardownPlan::build(db.connection(), &hotel)?;
        let executed = PlanExecutor::new(db.connection()).dry_run().execute(&plan)?;
        return Ok(DeletionResult {
            hotel_id,
            hotel_name: plan.hotel_name,
            dry_run: true,
            dependent_rows: executed.dependent_rows(),
            steps: executed.steps,
            dropped_tables: executed.dropped_tables,
            warnings: executed.warnings,
        });
    }

    log::info!("deleting hotel {hotel_id} ({})", hotel.name);
    let result = db.write("delete hotel", |tx| {
        let hotel = Database::get_hotel(tx, hotel_id)?.ok_or_else(|| not_found(hotel_id))?;
        let plan = TeardownPlan::build(tx, &hotel)?;
        for warning in &plan.warnings {
            log::warn!("{warning}");
        }
        let executed = PlanExecutor::new(tx).execute(&plan)?;
        Ok(DeletionResult {
            hotel_id,
            hotel_name: plan.hotel_name,
            dry_run: false,
            dependent_rows: executed.dependent_rows(),
            steps: executed.steps,
            dropped_tables: executed.dropped_tables,
            warnings: executed.warnings,
        })
    });

    match &result {
        Ok(deleted) => log::info!("{}", deleted.message()),
        Err(e) => log::warn!("deletion of hotel {hotel_id} failed and was rolled back: {e}"),
    }
    result
}
