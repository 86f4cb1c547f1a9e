//! Book command implementation.

use clap::Args;
use innkeep::api::{self, CreateBookingRequest};

use super::BodyArgs;
use crate::error::CliError;
use crate::utils::{
    build_context, load_configuration, open_database, print_response, read_body, GlobalOptions,
};

/// Book a room.
///
/// Body: `{"hotelId", "roomId", "guestName", "guestPhone", "checkinDate",
/// "checkoutDate", ...}`. Check-in and check-out times default to the
/// configured ones.
#[derive(Args)]
pub struct BookCommand {
    #[command(flatten)]
    body: BodyArgs,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let body = read_body(self.body.json)?;
        let config = load_configuration(global)?;
        let ctx = build_context(global, &config)?;
        let mut db = open_database(global, &config)?;

        let response = api::from_json(&body, |request: CreateBookingRequest| {
            api::create_booking(&mut db, &ctx, &config, request)
        });
        print_response(&response)
    }
}
