use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::dataset::{load_results, save_scored_results, ResultRow};
use crate::error::CvError;

use super::{EvalSample, GenerationEvaluator};

/// Scores pulled out of an evaluator result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreSummary {
    pub completeness_score: Option<f64>,
    pub redundancy_score: Option<f64>,
    pub explanation: Option<String>,
}

impl ScoreSummary {
    pub fn from_result(result: &Value) -> Self {
        let generation = result.get("generation");
        let score_of = |criterion: &str| {
            generation
                .and_then(|g| g.get(criterion))
                .and_then(|c| c.get("score"))
                .and_then(Value::as_f64)
        };
        Self {
            completeness_score: score_of("completeness"),
            redundancy_score: score_of("redundancy"),
            explanation: generation
                .and_then(|g| g.get("explanation"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    fn apply(self, row: &mut ResultRow) {
        row.completeness_score = self.completeness_score;
        row.redundancy_score = self.redundancy_score;
        row.explanation = self.explanation;
    }
}

/// Evaluates every row of the result table at `csv_path`, printing each
/// result to stdout.
pub async fn evaluate_results(
    evaluator: &dyn GenerationEvaluator,
    csv_path: impl AsRef<Path>,
    output: Option<&Path>,
) -> Result<Vec<ResultRow>, CvError> {
    let mut stdout = std::io::stdout();
    evaluate_results_to(&mut stdout, evaluator, csv_path, output).await
}

/// Like [`evaluate_results`], writing the report to `out`.
pub async fn evaluate_results_to<W: Write + Send>(
    out: &mut W,
    evaluator: &dyn GenerationEvaluator,
    csv_path: impl AsRef<Path>,
    output: Option<&Path>,
) -> Result<Vec<ResultRow>, CvError> {
    let mut rows = load_results(csv_path)?;
    let rule = "=".repeat(60);

    writeln!(out, "\n{rule}")?;
    writeln!(out, "EVALUATION RESULTS")?;
    writeln!(out, "{rule}")?;

    for (idx, row) in rows.iter_mut().enumerate() {
        writeln!(out, "\n--- Query {}: {} ---", idx + 1, row.query)?;
        match evaluator.evaluate(&EvalSample::from(&*row)).await {
            Ok(result) => {
                writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
                ScoreSummary::from_result(&result).apply(row);
            }
            Err(err) => {
                log::error!("evaluation failed for '{}': {err}", row.query);
                writeln!(out, "Error: {err}")?;
                ScoreSummary {
                    explanation: Some(format!("Error: {err}")),
                    ..Default::default()
                }
                .apply(row);
            }
        }
    }

    writeln!(out, "\n{rule}")?;
    writeln!(out, "Evaluation complete!")?;
    writeln!(out, "{rule}")?;

    if let Some(path) = output {
        save_scored_results(&rows, path)?;
    }
    Ok(rows)
}
