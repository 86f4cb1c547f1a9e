//! History command implementation.

use clap::Args;
use innkeep::api::{self, HistoryRequest};

use super::BodyArgs;
use crate::error::CliError;
use crate::utils::{
    build_context, load_configuration, open_database, print_response, read_body, GlobalOptions,
};

/// Show booking history for a hotel.
///
/// Body: `{"hotelId", "bookingId"?}`. History outlives the hotel, so this
/// works for deleted hotels too.
#[derive(Args)]
pub struct HistoryCommand {
    #[command(flatten)]
    body: BodyArgs,
}

impl HistoryCommand {
    /// Execute the history command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let body = read_body(self.body.json)?;
        let config = load_configuration(global)?;
        let ctx = build_context(global, &config)?;
        let db = open_database(global, &config)?;

        let response = api::from_json(&body, |request: HistoryRequest| {
            api::history(&db, &ctx, &request)
        });
        print_response(&response)
    }
}
