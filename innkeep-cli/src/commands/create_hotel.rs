//! Create-hotel command implementation.

use clap::Args;
use innkeep::api::{self, CreateHotelRequest};

use super::BodyArgs;
use crate::error::CliError;
use crate::utils::{
    build_context, load_configuration, open_database, print_response, read_body, GlobalOptions,
};

/// Create a hotel.
///
/// Body: `{"name": ..., "address"?, "phone"?, "email"?, "ownerId"?}`.
#[derive(Args)]
pub struct CreateHotelCommand {
    #[command(flatten)]
    body: BodyArgs,
}

impl CreateHotelCommand {
    /// Execute the create-hotel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let body = read_body(self.body.json)?;
        let config = load_configuration(global)?;
        let ctx = build_context(global, &config)?;
        let mut db = open_database(global, &config)?;

        let response = api::from_json(&body, |request: CreateHotelRequest| {
            api::create_hotel(&mut db, &ctx, request)
        });
        print_response(&response)
    }
}
