use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::chat::Tool;

use super::context::ToolContext;
use super::definition::ToolDefinition;
use super::error::ToolError;
use super::pdf_reader::{pdf_reader_tool, PdfReaderTool};

#[derive(Clone, Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the PDF reader tool.
    pub fn with_pdf_reader() -> Self {
        let mut registry = Self::new();
        registry.register(pdf_reader_tool(Arc::new(PdfReaderTool::new())));
        registry
    }

    /// Adds a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, definition: ToolDefinition) {
        self.tools.retain(|t| t.name != definition.name);
        self.tools.push(definition);
    }

    /// Keeps only the tools named in `names`.
    pub fn retain_named(&mut self, names: &[String]) {
        self.tools
            .retain(|tool| names.iter().any(|name| name == tool.name));
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    /// Tool schemas to advertise to the model.
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDefinition::to_tool).collect()
    }

    pub fn execute(
        &self,
        name: &str,
        args_json: &str,
        context: &ToolContext,
    ) -> Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name == name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let args = parse_args(args_json)?;
        validate_allowed_paths(&args, context)?;
        (tool.executor)(context, args)
    }
}

fn parse_args(raw: &str) -> Result<Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw).map_err(|err| ToolError::InvalidArgs(err.to_string()))
}

fn validate_allowed_paths(args: &Value, context: &ToolContext) -> Result<(), ToolError> {
    if context.allowed_paths.is_empty() {
        return Ok(());
    }
    let Some(raw) = args.get("file_path").and_then(Value::as_str) else {
        return Ok(());
    };
    let path = context.resolve(raw);
    let allowed = context
        .allowed_paths
        .iter()
        .any(|root| path.starts_with(root) && !escapes_root(&path));
    if !allowed {
        return Err(ToolError::Denied(format!("path not allowed: {raw}")));
    }
    Ok(())
}

fn escapes_root(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::tools::ToolParam;

    fn echo_tool() -> ToolDefinition {
        ToolDefinition {
            name: "echo",
            description: "Echo back the provided text.",
            params: vec![ToolParam::new("text", "Text to echo back.", "string")],
            required: vec!["text"],
            executor: Arc::new(|_ctx: &ToolContext, args: Value| {
                args.get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| ToolError::InvalidArgs("missing 'text'".to_string()))
            }),
        }
    }

    #[test]
    fn executes_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool());
        let out = registry
            .execute("echo", r#"{"text":"hi"}"#, &ToolContext::default())
            .unwrap();
        assert_eq!(out, "hi");
    }

    #[test]
    fn unknown_tool_and_bad_json_are_reported() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool());
        let ctx = ToolContext::default();
        assert_eq!(
            registry.execute("nope", "{}", &ctx),
            Err(ToolError::NotFound("nope".to_string()))
        );
        assert!(matches!(
            registry.execute("echo", "{not json", &ctx),
            Err(ToolError::InvalidArgs(_))
        ));
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = ToolRegistry::with_pdf_reader();
        registry.register(echo_tool());
        registry.register(echo_tool());
        assert_eq!(registry.tool_names(), vec!["pdf_reader_tool", "echo"]);
        registry.retain_named(&["echo".to_string()]);
        assert!(!registry.has_tool("pdf_reader_tool"));
        assert_eq!(registry.tools().len(), 1);
    }

    #[test]
    fn paths_outside_allowed_roots_are_denied() {
        let registry = ToolRegistry::with_pdf_reader();
        let ctx = ToolContext {
            allowed_paths: vec![PathBuf::from("/srv/cvs")],
            working_dir: Some(PathBuf::from("/srv/cvs")),
        };
        let denied = registry.execute("pdf_reader_tool", r#"{"file_path":"/etc/passwd"}"#, &ctx);
        assert!(matches!(denied, Err(ToolError::Denied(_))));

        let escaped = registry.execute("pdf_reader_tool", r#"{"file_path":"../x.pdf"}"#, &ctx);
        assert!(matches!(escaped, Err(ToolError::Denied(_))));

        let inside = registry
            .execute("pdf_reader_tool", r#"{"file_path":"missing.pdf"}"#, &ctx)
            .unwrap();
        assert!(inside.starts_with("Error reading file"));
    }
}
