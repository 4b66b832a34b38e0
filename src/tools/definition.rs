use std::sync::Arc;

use serde_json::Value;

use crate::chat::{FunctionBuilder, ParamBuilder, Tool};

use super::context::ToolContext;
use super::error::ToolError;

pub type ToolExecutor = Arc<dyn Fn(&ToolContext, Value) -> Result<String, ToolError> + Send + Sync>;

#[derive(Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ToolParam>,
    pub required: Vec<&'static str>,
    pub executor: ToolExecutor,
}

#[derive(Clone)]
pub struct ToolParam {
    pub name: &'static str,
    pub description: &'static str,
    pub param_type: &'static str,
}

impl ToolParam {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        param_type: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            param_type,
        }
    }
}

impl ToolDefinition {
    /// Chat-level description of this tool, as sent to the model.
    pub fn to_tool(&self) -> Tool {
        let mut builder = FunctionBuilder::new(self.name).description(self.description);
        for param in &self.params {
            builder = builder.param(
                ParamBuilder::new(param.name)
                    .description(param.description)
                    .type_of(param.param_type),
            );
        }
        if !self.required.is_empty() {
            builder = builder.required(self.required.iter().map(|s| s.to_string()).collect());
        }
        builder.build()
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}
