//! Layered configuration construction.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::{ConfigLoader, ConfigSource};
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builds a [`Config`] from defaults, the data directory's `config.yaml`,
/// `INNKEEP_*` environment variables and programmatic overrides, in that
/// order of increasing precedence.
///
/// # Examples
///
/// ```
/// use innkeep::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config {
///         maximum_lock_wait_seconds: Some(2),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.lock_wait().as_secs(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Vec<Config>,
}

impl ConfigBuilder {
    /// Creates a builder that reads every layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `config.yaml` from `data_dir` instead of the resolved default.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(data_dir.as_ref().to_path_buf());
        self
    }

    /// Skips the configuration file.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Skips environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Adds a programmatic layer above all others.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides.push(config);
        self
    }

    /// Merges the layers and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be parsed, an
    /// environment value is malformed, or the merged result is invalid.
    pub fn build(self) -> Result<Config> {
        let mut sources: Vec<ConfigSource> = Vec::new();
        if !self.skip_files {
            if let Some(source) = ConfigLoader::load_data_dir_config(self.data_dir.as_deref())? {
                log::debug!("loaded configuration from {}", source.path.display());
                sources.push(source);
            }
        }

        let mut config = ConfigMerger::merge(sources);
        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }
        for layer in &self.overrides {
            ConfigMerger::merge_into(&mut config, layer);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::CURRENCY_ENV;
    use crate::config::loader::CONFIG_FILE_NAME;
    use crate::error::Error;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_only() {
        let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_precedence_file_env_override() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "currency: GBP\nmaximum_lock_wait_seconds: 8\nutc_offset: \"+01:00\"\n",
        )
        .unwrap();
        std::env::set_var(CURRENCY_ENV, "EUR");

        let config = ConfigBuilder::new()
            .with_data_dir(temp.path())
            .with_config(Config {
                utc_offset: Some("+02:00".into()),
                ..Default::default()
            })
            .build();
        std::env::remove_var(CURRENCY_ENV);
        let config = config.unwrap();

        assert_eq!(config.maximum_lock_wait_seconds, Some(8));
        assert_eq!(config.currency.as_deref(), Some("EUR"));
        assert_eq!(config.utc_offset.as_deref(), Some("+02:00"));
    }

    #[test]
    fn test_invalid_file_value_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "utc_offset: nowhere\n").unwrap();

        let err = ConfigBuilder::new()
            .with_data_dir(temp.path())
            .skip_env()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "utc_offset"));
    }
}
