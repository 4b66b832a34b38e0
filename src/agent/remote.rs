//! Client for a hosted agent platform.
//!
//! The platform exposes a small REST surface:
//!
//! | call | endpoint |
//! |------|----------|
//! | tool lookup | `GET {api_url}/tools?name=<name>` |
//! | agent creation | `POST {api_url}/agents` |
//! | run | `POST {api_url}/agents/{id}/run` (multipart) |
//! | deletion | `DELETE {api_url}/agents/{id}` |
//!
//! Every JSON payload may come wrapped in a `{"data": ...}` envelope.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backends::openai::{ensure_success, parse_base_url, parse_response};
use crate::error::CvError;

use super::{Agent, AgentSpec, Attachment};

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug)]
pub struct PlatformConfig {
    pub api_url: Url,
    pub api_key: SecretString,
    pub timeout_seconds: Option<u64>,
}

/// HTTP client for the agent platform. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AgentPlatformClient {
    config: Arc<PlatformConfig>,
    client: Client,
}

/// A tool registered on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedAgent {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateAgentRequest<'a> {
    name: &'a str,
    instruction: &'a str,
    tools: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

impl AgentPlatformClient {
    pub fn new(
        api_url: &str,
        api_key: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, CvError> {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        Self::with_client(builder.build()?, api_url, api_key, timeout_seconds)
    }

    pub fn with_client(
        client: Client,
        api_url: &str,
        api_key: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, CvError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(CvError::AuthError(
                "Missing agent platform API key".to_string(),
            ));
        }
        Ok(Self {
            config: Arc::new(PlatformConfig {
                api_url: parse_base_url(api_url)?,
                api_key: SecretString::new(api_key),
                timeout_seconds,
            }),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CvError> {
        self.config
            .api_url
            .join(path)
            .map_err(|e| CvError::HttpError(e.to_string()))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(API_KEY_HEADER, self.config.api_key.expose_secret());
        match self.config.timeout_seconds {
            Some(timeout) => request.timeout(Duration::from_secs(timeout)),
            None => request,
        }
    }

    /// Looks up platform tools by name.
    pub async fn find_tools(&self, name: &str) -> Result<Vec<RemoteTool>, CvError> {
        let request = self
            .client
            .get(self.endpoint("tools")?)
            .query(&[("name", name)]);
        let response = self.authorized(request).send().await?;
        let tools: Envelope<Vec<RemoteTool>> = parse_response(response, "tool lookup").await?;
        Ok(tools.into_inner())
    }

    /// Creates an agent, resolving each tool name of `spec` to its platform id.
    pub async fn create_agent(&self, spec: &AgentSpec) -> Result<RemoteAgent, CvError> {
        let mut tool_ids = Vec::with_capacity(spec.tools.len());
        for tool_name in &spec.tools {
            let tool = self
                .find_tools(tool_name)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    CvError::InvalidRequest(format!("tool not found on platform: {tool_name}"))
                })?;
            log::debug!("resolved tool {tool_name} to {}", tool.id);
            tool_ids.push(tool.id);
        }

        let body = CreateAgentRequest {
            name: &spec.name,
            instruction: &spec.instruction,
            tools: tool_ids.iter().map(String::as_str).collect(),
        };
        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("agent creation payload: {json}");
            }
        }
        let request = self.client.post(self.endpoint("agents")?).json(&body);
        let response = self.authorized(request).send().await?;
        let created: Envelope<CreatedAgent> = parse_response(response, "agent creation").await?;
        let created = created.into_inner();
        log::info!("created agent {} ({})", spec.name, created.id);

        Ok(RemoteAgent {
            client: self.clone(),
            id: created.id,
            name: created.name.unwrap_or_else(|| spec.name.clone()),
        })
    }
}

/// An agent hosted on the platform.
#[derive(Debug, Clone)]
pub struct RemoteAgent {
    client: AgentPlatformClient,
    id: String,
    name: String,
}

impl RemoteAgent {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl Agent for RemoteAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, query: &str, files: &[Attachment]) -> Result<String, CvError> {
        let mut form = Form::new().text("input", query.to_string());
        for file in files {
            form = form.part(
                "files",
                Part::bytes(file.content.clone()).file_name(file.filename.clone()),
            );
        }
        let url = self.client.endpoint(&format!("agents/{}/run", self.id))?;
        let request = self.client.client.post(url).multipart(form);
        let response = self.client.authorized(request).send().await?;
        let text = ensure_success(response, "agent run").await?.text().await?;
        Ok(extract_output(text))
    }

    async fn delete(&self) -> Result<(), CvError> {
        let url = self.client.endpoint(&format!("agents/{}", self.id))?;
        let request = self.client.client.delete(url);
        let response = self.client.authorized(request).send().await?;
        ensure_success(response, "agent deletion").await?;
        log::info!("deleted agent {} ({})", self.name, self.id);
        Ok(())
    }
}

/// Pulls the answer out of a run response: `data.output`, `output`, a bare
/// JSON string, or the raw body.
fn extract_output(body: String) -> String {
    let Ok(value) = serde_json::from_str::<Value>(&body) else {
        return body;
    };
    let output = value
        .pointer("/data/output")
        .or_else(|| value.get("output"))
        .and_then(Value::as_str);
    match (output, &value) {
        (Some(out), _) => out.to_string(),
        (None, Value::String(s)) => s.clone(),
        (None, _) => body,
    }
}
