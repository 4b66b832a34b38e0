//! Tool execution error types.

/// Errors raised while dispatching a tool call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ToolError {
    /// Invalid arguments provided to the tool.
    #[error("invalid tool arguments: {0}")]
    InvalidArgs(String),

    /// Tool not found in registry.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Path argument outside the allowed roots.
    #[error("tool denied: {0}")]
    Denied(String),
}
