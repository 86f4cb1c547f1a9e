//! Room inventory commands: `add-room`, `list-rooms` and `update-room`.

use clap::Args;
use innkeep::api::{self, AddRoomRequest, HotelRequest, UpdateRoomRequest};

use super::BodyArgs;
use crate::error::CliError;
use crate::utils::{
    build_context, load_configuration, open_database, print_response, read_body, GlobalOptions,
};

/// Add a room to a hotel.
///
/// Body: `{"hotelId", "roomNumber", "price", "category"?, "description"?}`.
#[derive(Args)]
pub struct AddRoomCommand {
    #[command(flatten)]
    body: BodyArgs,
}

impl AddRoomCommand {
    /// Execute the add-room command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let body = read_body(self.body.json)?;
        let config = load_configuration(global)?;
        let ctx = build_context(global, &config)?;
        let mut db = open_database(global, &config)?;

        let response = api::from_json(&body, |request: AddRoomRequest| {
            api::add_room(&mut db, &ctx, request)
        });
        print_response(&response)
    }
}

/// List a hotel's rooms.
///
/// Body: `{"hotelId"}`.
#[derive(Args)]
pub struct ListRoomsCommand {
    #[command(flatten)]
    body: BodyArgs,
}

impl ListRoomsCommand {
    /// Execute the list-rooms command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let body = read_body(self.body.json)?;
        let config = load_configuration(global)?;
        let ctx = build_context(global, &config)?;
        let db = open_database(global, &config)?;

        let response = api::from_json(&body, |request: HotelRequest| {
            api::list_rooms(&db, &ctx, &request)
        });
        print_response(&response)
    }
}

/// Change a room's price, category or description.
///
/// Body: `{"hotelId", "roomId", "price"?, "category"?, "description"?}`.
/// Fields left out keep their stored values.
#[derive(Args)]
pub struct UpdateRoomCommand {
    #[command(flatten)]
    body: BodyArgs,
}

impl UpdateRoomCommand {
    /// Execute the update-room command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let body = read_body(self.body.json)?;
        let config = load_configuration(global)?;
        let ctx = build_context(global, &config)?;
        let mut db = open_database(global, &config)?;

        let response = api::from_json(&body, |request: UpdateRoomRequest| {
            api::update_room(&mut db, &ctx, request)
        });
        print_response(&response)
    }
}
