//! LLM-judged scoring of generated answers against reference answers.

mod criteria;
mod geval;
mod report;

use async_trait::async_trait;
use serde_json::Value;

use crate::dataset::ResultRow;
use crate::error::CvError;

pub use criteria::Criterion;
pub use geval::{GEvalGenerationEvaluator, DEFAULT_EVAL_MODEL};
pub use report::{evaluate_results, evaluate_results_to, ScoreSummary};

/// The fields a generation evaluator looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalSample {
    pub query: String,
    pub generated_response: String,
    pub expected_response: String,
}

impl From<&ResultRow> for EvalSample {
    fn from(row: &ResultRow) -> Self {
        Self {
            query: row.query.clone(),
            generated_response: row.generated_response.clone(),
            expected_response: row.expected_response.clone(),
        }
    }
}

/// Scores one sample. The result is a JSON document whose `generation`
/// object holds the overall score, an explanation and one entry per criterion.
#[async_trait]
pub trait GenerationEvaluator: Send + Sync {
    async fn evaluate(&self, sample: &EvalSample) -> Result<Value, CvError>;
}
