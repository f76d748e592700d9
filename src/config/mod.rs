mod file;

use std::{env, path::PathBuf};

pub use file::Config;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("neither {0} nor HOME is set")]
    NoHome(&'static str),
    #[error("config file {} should be readable: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config file {} should be parseable: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

fn default_config_file() -> Result<PathBuf, ConfigError> {
    let mut config_file = xdg_home("XDG_CONFIG_HOME", ".config")?;
    config_file.push(env!("CARGO_PKG_NAME"));
    config_file.push("config.toml");

    Ok(config_file)
}

fn default_database() -> Result<PathBuf, ConfigError> {
    let mut database = xdg_home("XDG_DATA_HOME", ".local/share")?;
    database.push(env!("CARGO_PKG_NAME"));
    database.push("inventory.db");

    Ok(database)
}

fn xdg_home(var: &'static str, below_home: &str) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = env::var_os(var).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let mut dir = env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::NoHome(var))?;
    dir.push(below_home);

    Ok(dir)
}
