//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management, request context construction and JSON I/O.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use innkeep::api::ApiResponse;
use innkeep::database::{resolve_data_dir, DATABASE_FILE_NAME};
use innkeep::{
    Config, ConfigBuilder, Database, DatabaseConfig, HotelId, Principal, RequestContext, Role,
};
use serde::Serialize;

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,

    /// Acting user name.
    pub user: String,

    /// Acting user's role.
    pub role: Role,

    /// Hotel the acting user is restricted to.
    pub hotel: Option<i64>,
}

/// Resolve the data directory: `--data-dir` / `INNKEEP_DATA_DIR`, then
/// `~/.innkeep`.
pub fn data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load layered configuration for the resolved data directory.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables
/// 2. `<data-dir>/config.yaml`
/// 3. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    ConfigBuilder::new()
        .with_data_dir(data_dir(global)?)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = data_dir(global)?.join(DATABASE_FILE_NAME);

    if !db_path.exists() && global.disable_autoinit {
        return Err(CliError::NoDataDirectory);
    }

    let timeout = global
        .busy_timeout
        .map_or_else(|| config.lock_wait(), |s| Duration::from_secs(s.into()));

    log::debug!(
        "opening {} (busy timeout {}s)",
        db_path.display(),
        timeout.as_secs()
    );
    let db_config = DatabaseConfig::new(db_path).with_busy_timeout(timeout);
    Database::open(db_config).map_err(CliError::from)
}

/// Build the request context from the principal flags.
///
/// "Today" follows the configured UTC offset when one is set.
pub fn build_context(global: &GlobalOptions, config: &Config) -> Result<RequestContext, CliError> {
    let principal = match global.role {
        Role::Admin => Principal::admin(global.user.clone()),
        Role::Manager => Principal::manager(global.user.clone()),
    };
    let scope = global
        .hotel
        .map(HotelId::try_from)
        .transpose()
        .map_err(|e| CliError::InvalidArguments(format!("--hotel: {e}")))?;

    let ctx = RequestContext::new(principal).with_hotel_scope(scope);
    Ok(match config.utc_offset() {
        Some(offset) => ctx.with_utc_offset(offset),
        None => ctx,
    })
}

/// Return the request body: the `--json` argument if given, stdin
/// otherwise.
pub fn read_body(json: Option<String>) -> Result<String, CliError> {
    if let Some(body) = json {
        return Ok(body);
    }
    let mut body = String::new();
    std::io::stdin().read_to_string(&mut body)?;
    if body.trim().is_empty() {
        return Err(CliError::InvalidArguments(
            "no request body (pass --json or pipe JSON on stdin)".to_string(),
        ));
    }
    Ok(body)
}

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Library(innkeep::Error::Serialization(e)))?;
    println!("{text}");
    Ok(())
}

/// Print a response and turn `success: false` into an error carrying its
/// kind, so the process exits with the matching code.
pub fn print_response<T: Serialize>(response: &ApiResponse<T>) -> Result<(), CliError> {
    print_json(response)?;
    match response.error {
        Some(kind) if !response.success => Err(CliError::Rejected {
            kind,
            message: response.message.clone(),
        }),
        _ => Ok(()),
    }
}
