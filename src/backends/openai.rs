//! OpenAI chat-completions client.
//!
//! Used as the judge model of the generation evaluator and as the model
//! behind the in-process agent. Supports function tools and JSON-schema
//! structured output.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::chat::{
    ChatMessage, ChatProvider, ChatResponse, ChatRole, MessageType, StructuredOutputFormat, Tool,
    ToolCall, Usage,
};
use crate::error::CvError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the OpenAI client.
#[derive(Debug)]
pub struct OpenAIConfig {
    /// API key for authentication with OpenAI.
    pub api_key: String,
    /// Base URL, always ending with a slash.
    pub base_url: Url,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate in responses.
    pub max_tokens: Option<u32>,
    /// Sampling temperature for response randomness.
    pub temperature: Option<f32>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
    /// System prompt prepended to every conversation.
    pub system: Option<String>,
}

/// Client for OpenAI's chat-completions API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub config: Arc<OpenAIConfig>,
    pub client: Client,
}

#[derive(Serialize, Debug)]
struct OpenAIChatMessage<'a> {
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<&'a [ToolCall]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

#[derive(Serialize, Debug)]
struct OpenAIResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: &'a StructuredOutputFormat,
}

/// Request payload for the chat-completions endpoint.
#[derive(Serialize, Debug)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [Tool]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAIResponseFormat<'a>>,
}

/// Response payload of the chat-completions endpoint.
#[derive(Deserialize, Debug)]
pub struct OpenAIChatResponse {
    choices: Vec<OpenAIChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatChoice {
    message: OpenAIChatMsg,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatMsg {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

impl std::fmt::Display for OpenAIChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.text(), self.tool_calls()) {
            (Some(text), _) => write!(f, "{text}"),
            (None, Some(calls)) => {
                let rendered = serde_json::to_string_pretty(&calls).map_err(|_| std::fmt::Error)?;
                write!(f, "{rendered}")
            }
            (None, None) => write!(f, "No response content"),
        }
    }
}

impl ChatResponse for OpenAIChatResponse {
    fn text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|content| !content.is_empty())
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        self.choices
            .first()
            .and_then(|c| c.message.tool_calls.clone())
            .filter(|calls| !calls.is_empty())
    }

    fn usage(&self) -> Option<Usage> {
        self.usage.clone()
    }
}

impl OpenAI {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Result<Self, CvError> {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        Self::with_client(
            builder.build()?,
            api_key,
            base_url,
            model,
            max_tokens,
            temperature,
            timeout_seconds,
            system,
        )
    }

    /// Creates a new OpenAI client with a custom HTTP client.
    #[allow(clippy::too_many_arguments)]
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Result<Self, CvError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(CvError::AuthError("Missing OpenAI API key".to_string()));
        }
        Ok(Self {
            config: Arc::new(OpenAIConfig {
                api_key,
                base_url: parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?,
                model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens,
                temperature,
                timeout_seconds,
                system,
            }),
            client,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.config.timeout_seconds
    }

    pub fn system(&self) -> Option<&str> {
        self.config.system.as_deref()
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        tools: Option<&'a [Tool]>,
        schema: Option<&'a StructuredOutputFormat>,
    ) -> OpenAIChatRequest<'a> {
        let mut openai_msgs: Vec<OpenAIChatMessage> = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = &self.config.system {
            openai_msgs.push(OpenAIChatMessage {
                role: "system",
                content: Some(system.as_str()),
                tool_calls: None,
                tool_call_id: None,
            });
        }
        openai_msgs.extend(messages.iter().flat_map(convert_message));

        let tools = tools.filter(|t| !t.is_empty());
        OpenAIChatRequest {
            model: &self.config.model,
            messages: openai_msgs,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
            tool_choice: tools.map(|_| "auto"),
            tools,
            response_format: schema.map(|json_schema| OpenAIResponseFormat {
                format_type: "json_schema",
                json_schema,
            }),
        }
    }

    fn chat_url(&self) -> Result<Url, CvError> {
        self.config
            .base_url
            .join("chat/completions")
            .map_err(|e| CvError::HttpError(e.to_string()))
    }

    async fn send_chat(
        &self,
        body: &OpenAIChatRequest<'_>,
    ) -> Result<Box<dyn ChatResponse>, CvError> {
        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(body) {
                log::trace!("OpenAI request payload: {json}");
            }
        }

        let mut request = self
            .client
            .post(self.chat_url()?)
            .bearer_auth(&self.config.api_key)
            .json(body);

        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }

        let response = request.send().await?;
        let parsed: OpenAIChatResponse = parse_response(response, "OpenAI chat").await?;
        Ok(Box::new(parsed))
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, CvError> {
        let body = self.build_request(messages, tools, None);
        self.send_chat(&body).await
    }

    async fn chat_structured(
        &self,
        messages: &[ChatMessage],
        schema: &StructuredOutputFormat,
    ) -> Result<Box<dyn ChatResponse>, CvError> {
        let body = self.build_request(messages, None, Some(schema));
        self.send_chat(&body).await
    }
}

fn convert_message(message: &ChatMessage) -> Vec<OpenAIChatMessage<'_>> {
    let role = match message.role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    };
    match &message.message_type {
        MessageType::Text => vec![OpenAIChatMessage {
            role,
            content: Some(message.content.as_str()),
            tool_calls: None,
            tool_call_id: None,
        }],
        MessageType::ToolUse(calls) => vec![OpenAIChatMessage {
            role: "assistant",
            content: Some(message.content.as_str()).filter(|c| !c.is_empty()),
            tool_calls: Some(calls.as_slice()),
            tool_call_id: None,
        }],
        MessageType::ToolResult(results) => results
            .iter()
            .map(|result| OpenAIChatMessage {
                role: "tool",
                content: Some(result.function.arguments.as_str()),
                tool_calls: None,
                tool_call_id: Some(result.id.as_str()),
            })
            .collect(),
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, CvError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| CvError::InvalidRequest(format!("invalid base URL {raw}: {e}")))
}

/// Checks the status of `response` and decodes its JSON body.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, CvError> {
    let resp_text = ensure_success(response, context).await?.text().await?;
    serde_json::from_str(&resp_text).map_err(|e| CvError::ResponseFormatError {
        message: format!("Failed to decode {context} response: {e}"),
        raw_response: resp_text,
    })
}

pub(crate) async fn ensure_success(
    response: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, CvError> {
    let status = response.status();
    log::debug!("{context} HTTP status: {status}");
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await?;
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(CvError::AuthError(format!(
            "{context} rejected credentials ({status}): {error_text}"
        )));
    }
    Err(CvError::ResponseFormatError {
        message: format!("{context} returned error status: {status}"),
        raw_response: error_text,
    })
}

#[cfg(test)]
mod tests;
