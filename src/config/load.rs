use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CvError;

use super::paths::ConfigPaths;
use super::types::AppConfig;

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub paths: ConfigPaths,
    pub config_exists: bool,
}

/// Reads the config file (defaults when absent) and applies environment
/// overrides from the process environment.
pub fn load_config(path_override: Option<PathBuf>) -> Result<LoadedConfig, CvError> {
    let paths = ConfigPaths::resolve(path_override)?;
    let (mut config, config_exists) = read_config(&paths.config_file)?;
    config.apply_env(|name| std::env::var(name).ok());
    log::debug!(
        "config {} ({})",
        paths.config_file.display(),
        if config_exists { "loaded" } else { "defaults" }
    );
    Ok(LoadedConfig {
        config,
        paths,
        config_exists,
    })
}

pub(super) fn read_config(path: &Path) -> Result<(AppConfig, bool), CvError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok((toml::from_str(&contents)?, true)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok((AppConfig::default(), false)),
        Err(err) => Err(CvError::Config(format!("{}: {err}", path.display()))),
    }
}
