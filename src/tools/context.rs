use std::path::{Path, PathBuf};

/// Execution context handed to every tool call.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Roots a path argument must live under; empty means unrestricted.
    pub allowed_paths: Vec<PathBuf>,
    /// Directory relative path arguments are resolved against.
    pub working_dir: Option<PathBuf>,
}

impl ToolContext {
    pub fn resolve(&self, raw: &str) -> PathBuf {
        let path = Path::new(raw);
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
