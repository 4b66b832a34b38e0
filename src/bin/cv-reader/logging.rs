use std::path::PathBuf;

use cv_reader::config::{ConfigPaths, LoggingConfig};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

/// Logs to stderr, or to a rotating file when `logging.path` is set.
pub fn init_logging(config: &LoggingConfig, paths: &ConfigPaths) -> anyhow::Result<LoggerHandle> {
    let logger = Logger::try_with_str(&config.level)?;
    let Some(path) = config.path.as_ref().map(PathBuf::from) else {
        return Ok(logger.log_to_stderr().start()?);
    };
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| paths.logs_dir.clone());
    let basename = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("cv-reader")
        .to_string();
    let handle = logger
        .log_to_file(FileSpec::default().directory(directory).basename(basename))
        .rotate(
            Criterion::Size(config.rotate_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.rotate_keep),
        )
        .start()?;
    Ok(handle)
}
