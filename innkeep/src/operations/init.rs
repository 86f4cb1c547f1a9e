//! Data directory initialization.
//!
//! Creates the data directory, the database with its static schema, and
//! optionally a commented configuration file and a first administrator.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::context::Role;
use crate::database::{DATABASE_FILE_NAME, Database, DatabaseConfig};
use crate::error::{Error, Result};

/// Options for initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a default `config.yaml`.
    pub create_config: bool,
    /// Username of an administrator account to create.
    pub admin_user: Option<String>,
}

impl InitOptions {
    /// Creates options for `data_dir`.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
            admin_user: None,
        }
    }

    /// Sets whether to replace an existing database.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to write a default configuration file.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Sets the administrator account to create.
    #[must_use]
    pub fn with_admin_user(mut self, admin_user: Option<String>) -> Self {
        self.admin_user = admin_user;
        self
    }
}

/// What initialization did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResult {
    /// The data directory was created.
    pub data_dir_created: bool,
    /// The database was created or recreated.
    pub database_created: bool,
    /// A configuration file was written.
    pub config_created: bool,
    /// Id of the administrator account, if one was created.
    pub admin_user_id: Option<i64>,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# innkeep configuration

# Seconds to wait for the database write lock (default: 5)
# maximum_lock_wait_seconds: 5

# Local time zone of the hotels, used to decide what "today" is (default: +00:00)
# utc_offset: "+06:00"

# Times applied when a booking request carries none
# default_checkin_time: "14:00:00"
# default_checkout_time: "11:00:00"

# Currency code shown next to amounts
# currency: USD
"#;

/// Initializes the data directory and database.
///
/// # Errors
///
/// Returns an error if:
/// - the directory or configuration file cannot be written
/// - the database already exists and `overwrite` is false
/// - the database cannot be created
///
/// # Examples
///
/// ```no_run
/// use innkeep::operations::init::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/innkeep-test"))
///     .with_create_config(true)
///     .with_admin_user(Some("root".into()));
///
/// let result = init_database(&options).unwrap();
/// println!("Database created: {}", result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        admin_user_id: None,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    let db_exists = db_path.exists();
    if db_exists && !options.overwrite {
        return Err(Error::validation(
            "database",
            format!(
                "Database already exists at {}. Use --overwrite to replace it.",
                db_path.display()
            ),
        ));
    }
    if db_exists {
        fs::remove_file(&db_path)?;
    }

    let db = Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;
    log::info!("initialized database at {}", db_path.display());

    if let Some(username) = options.admin_user.as_deref() {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::validation("username", "username must be non-empty"));
        }
        result.admin_user_id = Some(Database::insert_user(
            db.connection(),
            username,
            Role::Admin,
            None,
        )?);
    }

    if options.create_config {
        let config_path = options.data_dir.join("config.yaml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("innkeep");

        let result = init_database(&InitOptions::new(data_dir.clone())).unwrap();

        assert!(result.data_dir_created);
        assert!(result.database_created);
        assert!(!result.config_created);
        assert!(data_dir.join(DATABASE_FILE_NAME).exists());
    }

    #[test]
    fn test_init_with_config_and_admin() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("innkeep");

        let options = InitOptions::new(data_dir.clone())
            .with_create_config(true)
            .with_admin_user(Some("root".into()));
        let result = init_database(&options).unwrap();

        assert!(result.config_created);
        assert!(result.admin_user_id.is_some());

        let content = fs::read_to_string(data_dir.join("config.yaml")).unwrap();
        assert!(content.contains("maximum_lock_wait_seconds"));
        assert!(content.lines().all(|l| l.is_empty() || l.starts_with('#')));

        let db = Database::open(DatabaseConfig::new(data_dir.join(DATABASE_FILE_NAME))).unwrap();
        let user = Database::find_user(db.connection(), "root").unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_init_fails_without_overwrite() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("innkeep");
        init_database(&InitOptions::new(data_dir.clone())).unwrap();

        match init_database(&InitOptions::new(data_dir)) {
            Err(Error::Validation { field, message }) => {
                assert_eq!(field, "database");
                assert!(message.contains("--overwrite"));
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_init_with_overwrite() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("innkeep");
        init_database(&InitOptions::new(data_dir.clone())).unwrap();

        let result =
            init_database(&InitOptions::new(data_dir.clone()).with_overwrite(true)).unwrap();
        assert!(!result.data_dir_created);
        assert!(result.database_created);
    }

    #[test]
    fn test_existing_config_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("innkeep");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("config.yaml"), "currency: EUR\n").unwrap();

        let result =
            init_database(&InitOptions::new(data_dir.clone()).with_create_config(true)).unwrap();
        assert!(!result.config_created);
        assert_eq!(
            fs::read_to_string(data_dir.join("config.yaml")).unwrap(),
            "currency: EUR\n"
        );
    }
}
