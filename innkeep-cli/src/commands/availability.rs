//! Availability command implementation.
//!
//! Read-only: it never takes the write lock, so it can run alongside
//! bookings in other processes.

use clap::Args;
use innkeep::api::{self, AvailabilityQuery};

use super::BodyArgs;
use crate::error::CliError;
use crate::utils::{
    build_context, load_configuration, open_database, print_response, read_body, GlobalOptions,
};

/// Check whether a room is free between two dates.
///
/// Body: `{"hotelId", "roomId", "checkinDate", "checkoutDate"}`.
#[derive(Args)]
pub struct AvailabilityCommand {
    #[command(flatten)]
    body: BodyArgs,
}

impl AvailabilityCommand {
    /// Execute the availability command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let body = read_body(self.body.json)?;
        let config = load_configuration(global)?;
        let ctx = build_context(global, &config)?;
        let db = open_database(global, &config)?;

        let response = api::from_json(&body, |query: AvailabilityQuery| {
            api::availability(&db, &ctx, &query)
        });
        print_response(&response)
    }
}
