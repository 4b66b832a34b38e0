//! Agents that answer questions about attached documents.
//!
//! [`remote::RemoteAgent`] is hosted on an agent platform and reached over
//! HTTP. [`local::LocalAgent`] runs the same [`AgentSpec`] in-process on top
//! of any [`ChatProvider`](crate::chat::ChatProvider).

pub mod local;
pub mod remote;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CvError;
use crate::tools::PDF_READER_TOOL_NAME;

pub use local::LocalAgent;
pub use remote::{AgentPlatformClient, RemoteAgent, RemoteTool};

pub const CV_READER_INSTRUCTION: &str = "You are a helpful assistant that can read and analyze CV/resume files.\n\
Use the pdf_reader_tool to read PDF files when asked about CV content.\n\
Always use the tool to read the file before answering questions about it.";

/// A file sent along with a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

/// Name, instruction prompt and tool names an agent is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSpec {
    pub name: String,
    pub instruction: String,
    pub tools: Vec<String>,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            tools: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }

    /// The CV reading agent: a uniquely suffixed name, the CV instruction
    /// prompt and the PDF reader tool.
    pub fn cv_reader() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self::new(
            format!("cv-reader-agent-{}", &suffix[..8]),
            CV_READER_INSTRUCTION,
        )
        .with_tool(PDF_READER_TOOL_NAME)
    }
}

#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// Sends `query` with `files` attached and returns the answer text.
    async fn run(&self, query: &str, files: &[Attachment]) -> Result<String, CvError>;

    /// Releases the agent. Called once the agent is no longer needed.
    async fn delete(&self) -> Result<(), CvError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cv_reader_spec_has_unique_suffixed_name() {
        let a = AgentSpec::cv_reader();
        let b = AgentSpec::cv_reader();
        let suffix = a.name.strip_prefix("cv-reader-agent-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.name, b.name);
        assert_eq!(a.tools, vec!["pdf_reader_tool".to_string()]);
        assert!(a.instruction.contains("Always use the tool"));
    }
}
