use std::path::PathBuf;

use crate::error::CvError;

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub config_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl ConfigPaths {
    pub fn resolve(config_override: Option<PathBuf>) -> Result<Self, CvError> {
        if let Some(path) = config_override {
            let dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            return Ok(Self {
                logs_dir: dir.join("logs"),
                config_dir: dir,
                config_file: path,
            });
        }
        let config_dir = default_config_dir()?;
        Ok(Self {
            config_file: config_dir.join("config.toml"),
            logs_dir: default_logs_dir()?,
            config_dir,
        })
    }
}

fn home() -> Result<PathBuf, CvError> {
    dirs::home_dir()
        .ok_or_else(|| CvError::Config("missing home directory for config paths".to_string()))
}

fn default_config_dir() -> Result<PathBuf, CvError> {
    Ok(home()?.join(".config").join("cv-reader"))
}

fn default_logs_dir() -> Result<PathBuf, CvError> {
    Ok(home()?
        .join(".local")
        .join("share")
        .join("cv-reader")
        .join("logs"))
}
