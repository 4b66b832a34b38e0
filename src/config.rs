//! TOML configuration with environment overrides.
//!
//! The file lives at `~/.config/cv-reader/config.toml` unless a path is
//! given explicitly. A missing file means all defaults.

mod load;
mod paths;
mod types;

pub use load::{load_config, LoadedConfig};
pub use paths::ConfigPaths;
pub use types::{
    AgentBackend, AgentConfig, AppConfig, EvaluatorConfig, LocalConfig, LoggingConfig,
    PipelineConfig,
};

pub const LOG_ENV: &str = "CV_READER_LOG";

#[cfg(test)]
mod tests;
