//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use innkeep::Role;

use crate::commands::{
    AddRoomCommand, AvailabilityCommand, BookCommand, CreateHotelCommand, DeleteHotelCommand,
    HistoryCommand, InitCommand, ListRoomsCommand, SetStatusCommand, UpdateRoomCommand,
};

/// Command-line tool for multi-tenant hotel bookings.
#[derive(Parser)]
#[command(name = "innkeep")]
#[command(version, about = "Manage hotel rooms and bookings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "INNKEEP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "INNKEEP_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "INNKEEP_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    /// Acting user name, recorded in booking history
    #[arg(
        long,
        value_name = "NAME",
        global = true,
        env = "INNKEEP_USER",
        default_value = "admin"
    )]
    pub user: String,

    /// Acting user's role
    #[arg(
        long,
        value_enum,
        global = true,
        env = "INNKEEP_ROLE",
        default_value_t = RoleArg::Admin
    )]
    pub role: RoleArg,

    /// Restrict the acting user to one hotel
    #[arg(long, value_name = "HOTEL_ID", global = true, env = "INNKEEP_HOTEL")]
    pub hotel: Option<i64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Role accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// May act on every hotel and delete hotels
    Admin,
    /// May act only on the hotel given by --hotel
    Manager,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Manager => Role::Manager,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Create a hotel and its room and booking tables
    CreateHotel(CreateHotelCommand),

    /// Add a room to a hotel
    AddRoom(AddRoomCommand),

    /// List a hotel's rooms
    ListRooms(ListRoomsCommand),

    /// Check whether a room is free between two dates
    Availability(AvailabilityCommand),

    /// Book a room
    Book(BookCommand),

    /// Change a room's price, category or description
    UpdateRoom(UpdateRoomCommand),

    /// Move a booking to a new status
    SetStatus(SetStatusCommand),

    /// Delete a hotel and everything that belongs to it
    DeleteHotel(DeleteHotelCommand),

    /// Show booking history for a hotel
    History(HistoryCommand),
}
