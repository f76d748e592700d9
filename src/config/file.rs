use std::{
    fs::read_to_string,
    num::NonZeroU32,
    path::{Path, PathBuf},
    time::Duration,
};

use derive_getters::Getters;
use log::debug;
use serde::Deserialize;

use super::{ConfigError, default_config_file, default_database};

#[derive(Debug, Deserialize, Getters)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[getter(skip)]
    database: Option<PathBuf>,
    #[serde(default = "allocation_attempts")]
    #[getter(skip)]
    allocation_attempts: NonZeroU32,
    #[serde(default = "busy_timeout_ms")]
    busy_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            allocation_attempts: allocation_attempts(),
            busy_timeout_ms: busy_timeout_ms(),
        }
    }
}

impl Config {
    /// Reads the given file, or the default location if none is given. Only a
    /// missing default file falls back to the default configuration.
    pub fn load_from_file(file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_file = match file {
            Some(file) => file,
            None => {
                let file = default_config_file()?;
                if !file.exists() {
                    debug!("no config at {}, using defaults", file.display());
                    return Ok(Self::default());
                }
                file
            }
        };

        let contents = read_to_string(&config_file).map_err(|source| ConfigError::Read {
            path: config_file.clone(),
            source,
        })?;
        Self::from_toml(&contents, &config_file)
    }

    fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn database(&self) -> Result<PathBuf, ConfigError> {
        match &self.database {
            Some(database) => Ok(database.clone()),
            None => default_database(),
        }
    }

    pub fn allocation_attempts(&self) -> NonZeroU32 {
        self.allocation_attempts
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn allocation_attempts() -> NonZeroU32 {
    NonZeroU32::MIN.saturating_add(2)
}

fn busy_timeout_ms() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use std::fs;

    use assertables::*;
    use rstest::*;
    use tempfile::tempdir;

    use super::*;

    fn parsed(contents: &str) -> Result<Config, ConfigError> {
        Config::from_toml(contents, Path::new("config.toml"))
    }

    #[rstest]
    fn test_empty_config_uses_defaults() {
        let config = assert_ok!(parsed(""));

        assert_eq!(3, config.allocation_attempts().get());
        assert_eq!(Duration::from_secs(5), config.busy_timeout());
    }

    #[rstest]
    fn test_explicit_values_win() {
        let config = assert_ok!(parsed(
            r#"
            database = "/srv/inventory/assets.db"
            allocation_attempts = 5
            busy_timeout_ms = 250
            "#
        ));

        assert_eq!(
            PathBuf::from("/srv/inventory/assets.db"),
            assert_ok!(config.database())
        );
        assert_eq!(5, config.allocation_attempts().get());
        assert_eq!(Duration::from_millis(250), config.busy_timeout());
    }

    #[rstest]
    #[case("allocation_attempts = 0")]
    #[case("allocation_attempts = -1")]
    #[case("busy_timeout_ms = \"soon\"")]
    #[case("datebase = \"typo.db\"")]
    fn test_invalid_config_is_rejected(#[case] contents: &str) {
        assert!(matches!(parsed(contents), Err(ConfigError::Parse { .. })));
    }

    #[rstest]
    fn test_load_given_file() {
        let dir = assert_ok!(tempdir());
        let file = dir.path().join("config.toml");
        assert_ok!(fs::write(&file, "allocation_attempts = 1\n"));

        let config = assert_ok!(Config::load_from_file(Some(file)));

        assert_eq!(1, config.allocation_attempts().get());
    }

    #[rstest]
    fn test_missing_given_file_is_an_error() {
        let dir = assert_ok!(tempdir());

        let result = Config::load_from_file(Some(dir.path().join("missing.toml")));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
