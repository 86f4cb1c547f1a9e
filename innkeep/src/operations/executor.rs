//! Plan execution engine.
//!
//! Runs a [`TeardownPlan`] against a connection, normally the open
//! transaction of the caller. The executor never commits: on error the
//! caller drops its transaction and every completed step is undone.

use rusqlite::Connection;
use serde::Serialize;

use crate::database::quote_identifier;
use crate::error::{Error, Result};

use super::plan::{TeardownAction, TeardownPlan};

const DELETE_STATIC_BOOKINGS: &str =
    "DELETE FROM bookings WHERE room_id IN (SELECT id FROM rooms WHERE hotel_id = ?)";
const DELETE_STATIC_ROOMS: &str = "DELETE FROM rooms WHERE hotel_id = ?";
const DELETE_ROOM_CATEGORIES: &str = "DELETE FROM room_categories WHERE hotel_id = ?";
const DELETE_REVENUE: &str = "DELETE FROM revenue WHERE hotel_id = ?";
const DELETE_MANAGER_ASSIGNMENTS: &str = "DELETE FROM hotel_managers WHERE hotel_id = ?";
const DETACH_USERS: &str = "UPDATE users SET hotel_id = NULL WHERE hotel_id = ?";
const DELETE_HOTEL: &str = "DELETE FROM hotels WHERE id = ?";

/// The effect of one executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    /// What was done.
    pub description: String,
    /// Rows affected (zero for dropped tables).
    pub rows: usize,
    /// True if the affected rows count as removed dependents.
    #[serde(skip)]
    pub removes_dependent_rows: bool,
}

/// Result of executing a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Whether this was a dry run (no changes made).
    pub dry_run: bool,
    /// One entry per action, in execution order.
    pub steps: Vec<StepOutcome>,
    /// Dynamic tables that were (or would be) dropped.
    pub dropped_tables: Vec<String>,
    /// Warnings from the plan.
    pub warnings: Vec<String>,
}

impl ExecutionResult {
    fn empty(plan: &TeardownPlan, dry_run: bool) -> Self {
        Self {
            dry_run,
            steps: Vec::new(),
            dropped_tables: Vec::new(),
            warnings: plan.warnings.clone(),
        }
    }

    /// Total rows removed from tables that depended on the hotel.
    #[must_use]
    pub fn dependent_rows(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.removes_dependent_rows)
            .map(|s| s.rows)
            .sum()
    }
}

/// Executes teardown plans.
///
/// # Examples
///
/// ```no_run
/// use innkeep::operations::{PlanExecutor, TeardownPlan};
/// use innkeep::{Database, DatabaseConfig, HotelId};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
/// let hotel = Database::get_hotel(db.connection(), HotelId::try_from(1).unwrap())
///     .unwrap()
///     .unwrap();
/// let plan = TeardownPlan::build(db.connection(), &hotel).unwrap();
///
/// let result = PlanExecutor::new(db.connection()).dry_run().execute(&plan).unwrap();
/// assert!(result.dry_run);
/// ```
pub struct PlanExecutor<'a> {
    conn: &'a Connection,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor over `conn`.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            dry_run: false,
        }
    }

    /// Sets the executor to dry-run mode: the plan is described but not run.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionFailure`] naming the failed step.
    pub fn execute(&self, plan: &TeardownPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::empty(plan, self.dry_run);

        for action in &plan.actions {
            let rows = if self.dry_run {
                0
            } else {
                let rows = self.execute_action(action)?;
                log::debug!("{} ({rows} row(s))", action.description());
                rows
            };
            if let TeardownAction::DropTable { table } = action {
                result.dropped_tables.push(table.clone());
            }
            result.steps.push(StepOutcome {
                description: action.description(),
                rows,
                removes_dependent_rows: action.removes_dependent_rows(),
            });
        }

        Ok(result)
    }

    fn execute_action(&self, action: &TeardownAction) -> Result<usize> {
        let outcome = match action {
            TeardownAction::DeleteStaticBookings(id) => {
                self.conn.execute(DELETE_STATIC_BOOKINGS, [id])
            }
            TeardownAction::DeleteStaticRooms(id) => self.conn.execute(DELETE_STATIC_ROOMS, [id]),
            TeardownAction::DeleteRoomCategories(id) => {
                self.conn.execute(DELETE_ROOM_CATEGORIES, [id])
            }
            TeardownAction::DeleteRevenue(id) => self.conn.execute(DELETE_REVENUE, [id]),
            TeardownAction::DeleteManagerAssignments(id) => {
                self.conn.execute(DELETE_MANAGER_ASSIGNMENTS, [id])
            }
            TeardownAction::DetachUsers(id) => self.conn.execute(DETACH_USERS, [id]),
            TeardownAction::DropTable { table } => {
                let sql = format!("DROP TABLE IF EXISTS {}", quote_identifier(table)?);
                self.conn.execute(&sql, []).map(|_| 0)
            }
            TeardownAction::DeleteHotel(id) => self.conn.execute(DELETE_HOTEL, [id]),
        };

        outcome.map_err(|source| {
            log::warn!("teardown step failed: {} ({source})", action.description());
            Error::TransactionFailure {
                operation: action.description(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_test_database;
    use crate::database::{create_tenant_tables, table_exists, Database};
    use crate::{Hotel, NewHotel};

    fn stored_hotel(db: &Database) -> Hotel {
        let id = Database::insert_hotel(db.connection(), &NewHotel::named("Exec Inn")).unwrap();
        create_tenant_tables(db.connection(), id).unwrap();
        Database::get_hotel(db.connection(), id).unwrap().unwrap()
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let db = create_test_database();
        let hotel = stored_hotel(&db);
        let plan = TeardownPlan::build(db.connection(), &hotel).unwrap();

        let result = PlanExecutor::new(db.connection())
            .dry_run()
            .execute(&plan)
            .unwrap();
        assert!(result.dry_run);
        assert_eq!(result.steps.len(), plan.len());
        assert_eq!(result.dropped_tables.len(), 2);
        assert!(Database::hotel_exists(db.connection(), hotel.id).unwrap());
        assert!(table_exists(db.connection(), &format!("rooms_hotel_{}", hotel.id)).unwrap());
    }

    #[test]
    fn test_execute_counts_rows() {
        let db = create_test_database();
        let hotel = stored_hotel(&db);
        let conn = db.connection();
        conn.execute(
            "INSERT INTO revenue (hotel_id, amount, recorded_at) VALUES (?, 100, 'now'), (?, 200, 'now')",
            [hotel.id, hotel.id],
        )
        .unwrap();

        let plan = TeardownPlan::build(conn, &hotel).unwrap();
        let result = PlanExecutor::new(conn).execute(&plan).unwrap();

        assert_eq!(result.dependent_rows(), 2);
        assert!(!Database::hotel_exists(conn, hotel.id).unwrap());
        assert!(!table_exists(conn, &format!("bookings_hotel_{}", hotel.id)).unwrap());
    }
}
