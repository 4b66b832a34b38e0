use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::agent::local::DEFAULT_MAX_TOOL_ROUNDS;
use crate::backends::openai::DEFAULT_MODEL;
use crate::error::CvError;
use crate::evaluator::DEFAULT_EVAL_MODEL;

use super::LOG_ENV;

const DEFAULT_LOG_ROTATE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATE_KEEP: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub local: LocalConfig,
    pub evaluator: EvaluatorConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Overrides file values with the environment variables named by the
    /// `*_env` fields and [`LOG_ENV`]. Empty variables are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var(&self.agent.api_url_env) {
            self.agent.api_url = Some(url);
        }
        if let Some(key) = var(&self.agent.api_key_env) {
            self.agent.api_key = Some(SecretString::new(key));
        }
        if let Some(key) = var(&self.local.api_key_env) {
            self.local.api_key = Some(SecretString::new(key));
        }
        if let Some(key) = var(&self.evaluator.api_key_env) {
            self.evaluator.api_key = Some(SecretString::new(key));
        }
        if let Some(level) = var(LOG_ENV) {
            self.logging.level = level;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum AgentBackend {
    /// Agent hosted on the agent platform
    #[default]
    Remote,
    /// In-process agent over the OpenAI chat API
    Local,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub backend: AgentBackend,
    pub api_url: Option<String>,
    pub api_url_env: String,
    pub api_key: Option<SecretString>,
    pub api_key_env: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            backend: AgentBackend::Remote,
            api_url: None,
            api_url_env: "AIP_API_URL".to_string(),
            api_key: None,
            api_key_env: "AIP_API_KEY".to_string(),
            timeout_seconds: None,
        }
    }
}

impl AgentConfig {
    pub fn require_api_url(&self) -> Result<&str, CvError> {
        self.api_url
            .as_deref()
            .ok_or_else(|| CvError::Config(format!("{} is not set", self.api_url_env)))
    }

    pub fn require_api_key(&self) -> Result<&str, CvError> {
        require_secret(&self.api_key, &self.api_key_env)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub api_key_env: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
    pub max_tool_rounds: usize,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: None,
            max_tokens: None,
            timeout_seconds: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }
}

impl LocalConfig {
    pub fn require_api_key(&self) -> Result<&str, CvError> {
        require_secret(&self.api_key, &self.api_key_env)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub api_key_env: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_EVAL_MODEL.to_string(),
            base_url: None,
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: None,
        }
    }
}

impl EvaluatorConfig {
    pub fn require_api_key(&self) -> Result<&str, CvError> {
        require_secret(&self.api_key, &self.api_key_env)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub csv_file: String,
    pub output: Option<String>,
    pub scored_output: Option<String>,
    pub document: String,
    pub checkpoint: bool,
    pub skip_evaluation: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            csv_file: "cv_agent_results.csv".to_string(),
            output: None,
            scored_output: None,
            document: "sample_cv.pdf".to_string(),
            checkpoint: false,
            skip_evaluation: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub path: Option<String>,
    pub rotate_size: u64,
    pub rotate_keep: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
            rotate_size: DEFAULT_LOG_ROTATE_SIZE,
            rotate_keep: DEFAULT_LOG_ROTATE_KEEP,
        }
    }
}

fn require_secret<'a>(secret: &'a Option<SecretString>, env: &str) -> Result<&'a str, CvError> {
    secret
        .as_ref()
        .map(|s| s.expose_secret().as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CvError::AuthError(format!("{env} is not set")))
}
