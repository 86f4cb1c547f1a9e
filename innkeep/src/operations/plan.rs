//! Plan types for hotel teardown.
//!
//! A teardown is described as an ordered list of actions before anything is
//! deleted. The plan can be shown to the caller (dry run) or handed to the
//! [`PlanExecutor`](super::PlanExecutor).

use rusqlite::Connection;
use serde::Serialize;

use crate::database::{probe, TenantTables};
use crate::error::Result;
use crate::{Hotel, HotelId};

/// A single step of a hotel teardown.
///
/// The variants are listed in the order a plan executes them: rows that
/// reference other rows go first, the hotel row goes last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownAction {
    /// Delete static `bookings` rows that reference the hotel's static rooms.
    DeleteStaticBookings(HotelId),
    /// Delete the hotel's static `rooms` rows.
    DeleteStaticRooms(HotelId),
    /// Delete the hotel's `room_categories` rows.
    DeleteRoomCategories(HotelId),
    /// Delete the hotel's `revenue` rows.
    DeleteRevenue(HotelId),
    /// Delete the hotel's `hotel_managers` rows.
    DeleteManagerAssignments(HotelId),
    /// Set `users.hotel_id` to NULL for the hotel's users.
    DetachUsers(HotelId),
    /// Drop one of the hotel's dynamic tables.
    DropTable {
        /// Table name.
        table: String,
    },
    /// Delete the hotel row itself.
    DeleteHotel(HotelId),
}

impl TeardownAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::DeleteStaticBookings(id) => {
                format!("Delete static bookings for rooms of hotel {id}")
            }
            Self::DeleteStaticRooms(id) => format!("Delete static rooms of hotel {id}"),
            Self::DeleteRoomCategories(id) => format!("Delete room categories of hotel {id}"),
            Self::DeleteRevenue(id) => format!("Delete revenue entries of hotel {id}"),
            Self::DeleteManagerAssignments(id) => {
                format!("Delete manager assignments of hotel {id}")
            }
            Self::DetachUsers(id) => format!("Detach users from hotel {id}"),
            Self::DropTable { table } => format!("Drop table {table}"),
            Self::DeleteHotel(id) => format!("Delete hotel {id}"),
        }
    }

    /// Returns true if the rows this action touches are removed (as
    /// opposed to updated or dropped wholesale).
    #[must_use]
    pub const fn removes_dependent_rows(&self) -> bool {
        matches!(
            self,
            Self::DeleteStaticBookings(_)
                | Self::DeleteStaticRooms(_)
                | Self::DeleteRoomCategories(_)
                | Self::DeleteRevenue(_)
                | Self::DeleteManagerAssignments(_)
        )
    }
}

/// An ordered teardown plan for one hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeardownPlan {
    /// The hotel being removed.
    pub hotel_id: HotelId,
    /// Its name, for reporting.
    pub hotel_name: String,
    /// The sequence of actions to perform.
    pub actions: Vec<TeardownAction>,
    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl TeardownPlan {
    /// Creates an empty plan for `hotel`.
    #[must_use]
    pub fn new(hotel: &Hotel) -> Self {
        Self {
            hotel_id: hotel.id,
            hotel_name: hotel.name.clone(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Builds the full plan for `hotel`, probing which dynamic tables exist.
    ///
    /// Missing dynamic tables are skipped; a half-present pair is reported
    /// as a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog probe fails.
    pub fn build(conn: &Connection, hotel: &Hotel) -> Result<Self> {
        let id = hotel.id;
        let tables = TenantTables::for_hotel(id);
        let presence = probe(conn, &tables)?;

        let mut plan = Self::new(hotel)
            .add_action(TeardownAction::DeleteStaticBookings(id))
            .add_action(TeardownAction::DeleteStaticRooms(id))
            .add_action(TeardownAction::DeleteRoomCategories(id))
            .add_action(TeardownAction::DeleteRevenue(id))
            .add_action(TeardownAction::DeleteManagerAssignments(id))
            .add_action(TeardownAction::DetachUsers(id));

        if presence.rooms {
            plan = plan.add_action(TeardownAction::DropTable {
                table: tables.rooms().to_string(),
            });
        }
        if presence.bookings {
            plan = plan.add_action(TeardownAction::DropTable {
                table: tables.bookings().to_string(),
            });
        }
        if presence.is_partial() {
            plan = plan.add_warning(format!(
                "hotel {id} had only one of {} / {}",
                tables.rooms(),
                tables.bookings()
            ));
        }

        Ok(plan.add_action(TeardownAction::DeleteHotel(id)))
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: TeardownAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Descriptions of every action, in order.
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.actions.iter().map(TeardownAction::description).collect()
    }
}
