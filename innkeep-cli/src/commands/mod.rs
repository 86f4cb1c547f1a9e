//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Initialize the data directory and database
//! - `create_hotel`: Provision a hotel and its dynamic tables
//! - `rooms`: `add-room`, `list-rooms` and `update-room`
//! - `availability`: Check a room for a stay
//! - `book`: Create a booking
//! - `set_status`: Move a booking through its lifecycle
//! - `history`: List booking history
//! - `delete_hotel`: Tear a hotel down
//!
//! Every command except `init` takes a JSON request body through `--json`
//! or stdin and prints the JSON response on stdout.

use clap::Args;

pub mod availability;
pub mod book;
pub mod create_hotel;
pub mod delete_hotel;
pub mod history;
pub mod init;
pub mod rooms;
pub mod set_status;

pub use availability::AvailabilityCommand;
pub use book::BookCommand;
pub use create_hotel::CreateHotelCommand;
pub use delete_hotel::DeleteHotelCommand;
pub use history::HistoryCommand;
pub use init::InitCommand;
pub use rooms::{AddRoomCommand, ListRoomsCommand, UpdateRoomCommand};
pub use set_status::SetStatusCommand;

/// Request body shared by the JSON commands.
#[derive(Args, Debug, Clone, Default)]
pub struct BodyArgs {
    /// Request body as JSON (read from stdin when omitted)
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,
}
