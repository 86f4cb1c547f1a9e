//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the innkeep data directory and database.

use std::path::PathBuf;

use clap::Parser;
use innkeep::database::default_data_dir;
use innkeep::operations::{init_database, InitOptions};

use crate::error::CliError;
use crate::utils::{print_json, GlobalOptions};

/// Initialize innkeep data directory and database.
#[derive(Parser)]
#[command(about = "Initialize innkeep data directory and database")]
pub struct InitCommand {
    /// Data directory to initialize
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Overwrite existing database
    #[arg(long)]
    overwrite: bool,

    /// Create default configuration file
    #[arg(long)]
    with_config: bool,

    /// Create an administrator account with this user name
    #[arg(long, value_name = "NAME")]
    admin_user: Option<String>,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// The --data-dir flag has a different meaning here (where to create,
    /// not where to find).
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Priority: command flag > global flag > default
        let data_dir = self
            .data_dir
            .or_else(|| global.data_dir.clone())
            .or_else(|| default_data_dir().ok())
            .ok_or_else(|| {
                CliError::Config(
                    "Could not determine data directory (home directory not found)".to_string(),
                )
            })?;

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config)
            .with_admin_user(self.admin_user);

        let result = init_database(&options).map_err(CliError::from)?;
        print_json(&result)
    }
}
