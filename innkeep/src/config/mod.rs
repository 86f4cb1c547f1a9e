//! Configuration system for innkeep.
//!
//! This module provides layered configuration with support for:
//! - a YAML file at `<data-dir>/config.yaml`
//! - `INNKEEP_*` environment variable overrides
//! - programmatic overrides via the builder
//! - validation of the merged result
//!
//! # Configuration Precedence
//!
//! Highest to lowest:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`INNKEEP_*`)
//! 3. `<data-dir>/config.yaml`
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use innkeep::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .with_data_dir("/var/lib/innkeep")
//!     .build()
//!     .unwrap();
//!
//! println!("checkout defaults to {:?}", config.checkout_time());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{
    parse_utc_offset, Config, DEFAULT_CHECKIN_TIME, DEFAULT_CHECKOUT_TIME, DEFAULT_CURRENCY,
    DEFAULT_LOCK_WAIT_SECONDS,
};
pub use validator::ConfigValidator;
