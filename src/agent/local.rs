//! In-process agent driven by a chat model and the local tool registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::chat::{ChatMessage, ChatProvider, FunctionCall, ToolCall};
use crate::error::CvError;
use crate::tools::{ToolContext, ToolRegistry};

use super::{Agent, AgentSpec, Attachment};

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// Runs an [`AgentSpec`] locally: attachments land in a private temporary
/// directory and the model reads them through the registered tools.
pub struct LocalAgent {
    spec: AgentSpec,
    provider: Arc<dyn ChatProvider>,
    registry: ToolRegistry,
    max_tool_rounds: usize,
}

impl LocalAgent {
    /// Creates the agent. Tools not named by `spec` are dropped from `registry`.
    pub fn new(spec: AgentSpec, provider: Arc<dyn ChatProvider>, mut registry: ToolRegistry) -> Self {
        registry.retain_named(&spec.tools);
        for missing in spec.tools.iter().filter(|name| !registry.has_tool(name)) {
            log::warn!("agent {} requests unknown tool {missing}", spec.name);
        }
        Self {
            spec,
            provider,
            registry,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    fn execute_calls(&self, calls: &[ToolCall], context: &ToolContext) -> Vec<ToolCall> {
        calls
            .iter()
            .map(|call| {
                log::debug!("tool call {} {}", call.function.name, call.function.arguments);
                let output = self
                    .registry
                    .execute(&call.function.name, &call.function.arguments, context)
                    .unwrap_or_else(|err| format!("Tool error: {err}"));
                ToolCall {
                    id: call.id.clone(),
                    call_type: call.call_type.clone(),
                    function: FunctionCall {
                        name: call.function.name.clone(),
                        arguments: output,
                    },
                }
            })
            .collect()
    }
}

#[async_trait]
impl Agent for LocalAgent {
    fn name(&self) -> &str {
        &self.spec.name
    }

    async fn run(&self, query: &str, files: &[Attachment]) -> Result<String, CvError> {
        let workdir = tempfile::tempdir()?;
        let paths = write_attachments(workdir.path(), files)?;
        let context = ToolContext {
            allowed_paths: vec![workdir.path().to_path_buf()],
            working_dir: Some(workdir.path().to_path_buf()),
        };

        let tools = self.registry.tools();
        let mut messages = vec![
            ChatMessage::system().content(&self.spec.instruction).build(),
            ChatMessage::user().content(user_prompt(query, &paths)).build(),
        ];

        for round in 0..=self.max_tool_rounds {
            let response = self
                .provider
                .chat_with_tools(&messages, Some(&tools[..]))
                .await?;
            let calls = response.tool_calls().unwrap_or_default();
            if calls.is_empty() {
                return Ok(response.text().unwrap_or_default());
            }
            if round == self.max_tool_rounds {
                break;
            }
            let results = self.execute_calls(&calls, &context);
            messages.push(ChatMessage::assistant().tool_use(calls).build());
            messages.push(ChatMessage::assistant().tool_result(results).build());
        }

        Err(CvError::Generic(format!(
            "agent {} exceeded {} tool rounds",
            self.spec.name, self.max_tool_rounds
        )))
    }

    async fn delete(&self) -> Result<(), CvError> {
        log::debug!("local agent {} has nothing to delete", self.spec.name);
        Ok(())
    }
}

fn write_attachments(dir: &Path, files: &[Attachment]) -> Result<Vec<PathBuf>, CvError> {
    files
        .iter()
        .enumerate()
        .map(|(idx, file)| {
            let name = Path::new(&file.filename)
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| format!("attachment-{idx}").into());
            let path = dir.join(name);
            std::fs::write(&path, &file.content)?;
            Ok(path)
        })
        .collect()
}

fn user_prompt(query: &str, paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return query.to_string();
    }
    let listing = paths
        .iter()
        .map(|p| format!("- {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{query}\n\nAttached files:\n{listing}")
}
