use async_trait::async_trait;

use crate::error::CvError;

use super::message::ChatMessage;
use super::tool::{StructuredOutputFormat, Tool, ToolCall};
use super::usage::Usage;

pub trait ChatResponse: std::fmt::Debug + std::fmt::Display + Send + Sync {
    fn text(&self) -> Option<String>;
    fn tool_calls(&self) -> Option<Vec<ToolCall>>;
    fn usage(&self) -> Option<Usage> {
        None
    }
}

/// Trait for providers that support chat-style interactions.
#[async_trait]
pub trait ChatProvider: Sync + Send {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, CvError> {
        self.chat_with_tools(messages, None).await
    }

    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, CvError>;

    /// Chat constrained to a JSON schema. Providers without structured output
    /// support fall back to a plain chat and rely on the prompt.
    async fn chat_structured(
        &self,
        messages: &[ChatMessage],
        _schema: &StructuredOutputFormat,
    ) -> Result<Box<dyn ChatResponse>, CvError> {
        self.chat(messages).await
    }
}
