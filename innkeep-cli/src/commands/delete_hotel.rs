//! Delete-hotel command implementation.
//!
//! This module implements the `delete-hotel` command, which removes a
//! hotel's static rows, drops its dynamic tables and deletes the hotel row
//! in one transaction.

use clap::Args;
use innkeep::api::{self, DeleteHotelRequest};

use super::BodyArgs;
use crate::error::CliError;
use crate::utils::{
    build_context, load_configuration, open_database, print_response, read_body, GlobalOptions,
};

/// Delete a hotel and everything that belongs to it.
///
/// Body: `{"hotelId", "dryRun"?}`.
#[derive(Args)]
pub struct DeleteHotelCommand {
    #[command(flatten)]
    body: BodyArgs,

    /// Show the teardown steps without deleting anything
    #[arg(long)]
    dry_run: bool,
}

impl DeleteHotelCommand {
    /// Execute the delete-hotel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let dry_run = self.dry_run;
        let body = read_body(self.body.json)?;
        let config = load_configuration(global)?;
        let ctx = build_context(global, &config)?;
        let mut db = open_database(global, &config)?;

        let response = api::from_json(&body, |mut request: DeleteHotelRequest| {
            request.dry_run |= dry_run;
            api::delete_hotel(&mut db, &ctx, &request)
        });
        print_response(&response)
    }
}
