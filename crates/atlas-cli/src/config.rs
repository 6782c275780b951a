//! TOML configuration discovery.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use atlas::{AtlasError, config::AppConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for AtlasError {
    fn from(err: ConfigError) -> Self {
        AtlasError::Config(err.to_string())
    }
}

const LOCAL_CONFIG: &str = "atlas/config.toml";

/// Resolves the configuration for a run.
///
/// An explicit path must exist. Otherwise the first existing file among
/// `atlas/config.toml` and the platform config directory is used, and the
/// built-in defaults apply when neither exists.
///
/// # Errors
///
/// Returns [`AtlasError::Config`] when the explicit file is missing or a
/// chosen file is not valid TOML for [`AppConfig`].
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, AtlasError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        return read_config(path);
    }

    match discovered_config() {
        Some(path) => read_config(&path),
        None => {
            debug!("No configuration file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn discovered_config() -> Option<PathBuf> {
    let system = ProjectDirs::from("com", "atlas", "atlas")
        .map(|dirs| dirs.config_dir().join("config.toml"));

    [Some(PathBuf::from(LOCAL_CONFIG)), system]
        .into_iter()
        .flatten()
        .inspect(|path| debug!(path:? = path; "Looking for configuration"))
        .find(|path| path.is_file())
}

fn read_config(path: &Path) -> Result<AppConfig, AtlasError> {
    info!(path:? = path; "Loading configuration");

    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;

    Ok(config)
}
