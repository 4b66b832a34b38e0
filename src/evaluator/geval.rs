//! G-Eval style judge: one structured chat call per criterion.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::backends::openai::OpenAI;
use crate::chat::{ChatMessage, ChatProvider, StructuredOutputFormat};
use crate::error::CvError;

use super::{Criterion, EvalSample, GenerationEvaluator};

pub const DEFAULT_EVAL_MODEL: &str = "openai/gpt-4o-mini";

const JUDGE_SYSTEM_PROMPT: &str =
    "You are a strict evaluator of answers about CV/resume documents. Reply only with JSON.";

const FENCED_JSON: &str = r"(?s)```(?:json)?\s*(\{.*?\})\s*```";
const EMBEDDED_JSON: &str = r"(?s)\{.*\}";

/// Score and rationale returned by the judge for one criterion.
#[derive(Debug, Clone, PartialEq)]
struct Judgement {
    score: f64,
    explanation: String,
}

pub struct GEvalGenerationEvaluator {
    provider: Arc<dyn ChatProvider>,
    criteria: Vec<Criterion>,
    fenced: Regex,
    embedded: Regex,
}

impl std::fmt::Debug for GEvalGenerationEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GEvalGenerationEvaluator")
            .field("criteria", &self.criteria)
            .finish_non_exhaustive()
    }
}

impl GEvalGenerationEvaluator {
    pub fn new(provider: Arc<dyn ChatProvider>, criteria: Vec<Criterion>) -> Result<Self, CvError> {
        if criteria.is_empty() {
            return Err(CvError::InvalidRequest(
                "at least one evaluation criterion is required".to_string(),
            ));
        }
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| CvError::Generic(format!("bad pattern: {e}")))
        };
        Ok(Self {
            provider,
            criteria,
            fenced: compile(FENCED_JSON)?,
            embedded: compile(EMBEDDED_JSON)?,
        })
    }

    /// Builds the evaluator from a `provider/model` identifier such as
    /// `openai/gpt-4o-mini`, using the default criteria.
    pub fn from_model(model: &str, api_key: impl Into<String>) -> Result<Self, CvError> {
        Self::from_model_with(model, api_key, None, None)
    }

    pub fn from_model_with(
        model: &str,
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, CvError> {
        let (provider, model_name) = model.split_once('/').ok_or_else(|| {
            CvError::InvalidRequest(format!("expected <provider>/<model>, got {model}"))
        })?;
        if provider != "openai" {
            return Err(CvError::InvalidRequest(format!(
                "unsupported evaluator provider: {provider}"
            )));
        }
        let client = OpenAI::new(
            api_key,
            base_url,
            Some(model_name.to_string()),
            None,
            Some(0.0),
            timeout_seconds,
            Some(JUDGE_SYSTEM_PROMPT.to_string()),
        )?;
        Self::new(Arc::new(client), Criterion::defaults())
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    async fn judge(&self, criterion: &Criterion, sample: &EvalSample) -> Result<Judgement, CvError> {
        let messages = [ChatMessage::user().content(criterion.prompt(sample)).build()];
        let response = self
            .provider
            .chat_structured(&messages, &score_schema(criterion))
            .await?;
        let text = response.text().unwrap_or_default();
        let judgement = self.parse_judgement(&text)?;
        Ok(Judgement {
            score: criterion.clamp(judgement.score),
            ..judgement
        })
    }

    /// Accepts a bare JSON object, one inside a code fence, or one embedded
    /// in surrounding prose.
    fn parse_judgement(&self, text: &str) -> Result<Judgement, CvError> {
        let trimmed = text.trim();
        let fenced = self
            .fenced
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());
        let embedded = self.embedded.find(trimmed).map(|m| m.as_str());

        [Some(trimmed), fenced, embedded]
            .into_iter()
            .flatten()
            .filter_map(|candidate| serde_json::from_str::<Value>(candidate).ok())
            .find_map(|value| judgement_from_value(&value))
            .ok_or_else(|| CvError::ResponseFormatError {
                message: "judge reply has no score object".to_string(),
                raw_response: text.to_string(),
            })
    }
}

fn judgement_from_value(value: &Value) -> Option<Judgement> {
    let score = match value.get("score")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    let explanation = value
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(Judgement { score, explanation })
}

fn score_schema(criterion: &Criterion) -> StructuredOutputFormat {
    StructuredOutputFormat {
        name: format!("{}_score", criterion.name),
        description: Some(format!("Score for {}", criterion.name)),
        schema: Some(json!({
            "type": "object",
            "properties": {
                "score": {"type": "number"},
                "explanation": {"type": "string"}
            },
            "required": ["score", "explanation"],
            "additionalProperties": false
        })),
        strict: Some(true),
    }
}

#[async_trait]
impl GenerationEvaluator for GEvalGenerationEvaluator {
    async fn evaluate(&self, sample: &EvalSample) -> Result<Value, CvError> {
        let mut generation = Map::new();
        let mut total = 0.0;
        let mut explanations = Vec::with_capacity(self.criteria.len());

        for criterion in &self.criteria {
            let judgement = self.judge(criterion, sample).await?;
            log::debug!("{} scored {}", criterion.name, judgement.score);
            total += judgement.score;
            explanations.push(format!("{}: {}", criterion.name, judgement.explanation));
            generation.insert(
                criterion.name.clone(),
                json!({"score": judgement.score, "explanation": judgement.explanation}),
            );
        }

        generation.insert(
            "score".to_string(),
            json!(total / self.criteria.len() as f64),
        );
        generation.insert("explanation".to_string(), json!(explanations.join("\n")));
        Ok(json!({ "generation": generation }))
    }
}
