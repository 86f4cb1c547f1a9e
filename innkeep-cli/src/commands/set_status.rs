//! Set-status command implementation.

use clap::Args;
use innkeep::api::{self, TransitionRequest};

use super::BodyArgs;
use crate::error::CliError;
use crate::utils::{
    build_context, load_configuration, open_database, print_response, read_body, GlobalOptions,
};

/// Move a booking to a new status.
///
/// Body: `{"hotelId", "bookingId", "status"}` with status one of
/// `checked_in`, `checked_out` or `cancelled`.
#[derive(Args)]
pub struct SetStatusCommand {
    #[command(flatten)]
    body: BodyArgs,
}

impl SetStatusCommand {
    /// Execute the set-status command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let body = read_body(self.body.json)?;
        let config = load_configuration(global)?;
        let ctx = build_context(global, &config)?;
        let mut db = open_database(global, &config)?;

        let response = api::from_json(&body, |request: TransitionRequest| {
            api::transition(&mut db, &ctx, &request)
        });
        print_response(&response)
    }
}
