//! Tools the agent can call.

mod context;
mod definition;
mod error;
mod pdf_reader;
mod registry;

pub use context::ToolContext;
pub use definition::{ToolDefinition, ToolExecutor, ToolParam};
pub use error::ToolError;
pub use pdf_reader::{pdf_reader_tool, PdfReaderTool, PDF_READER_TOOL_NAME};
pub use registry::ToolRegistry;
