//! End-to-end flow: answer every query, save the table, score it.

use std::path::{Path, PathBuf};

use crate::agent::Agent;
use crate::config::PipelineConfig;
use crate::dataset::{load_queries, save_results, ResultRow};
use crate::error::CvError;
use crate::evaluator::{evaluate_results, GenerationEvaluator};
use crate::runner::{read_file_as_binary, QueryRunner};

pub const DEFAULT_ASK_QUERY: &str =
    "Read the CV from sample_cv.pdf and tell me the candidate's name.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Input table of queries.
    pub csv_file: PathBuf,
    /// Where answers are written; the input table when unset.
    pub output: Option<PathBuf>,
    /// Where the scored table is written, if anywhere.
    pub scored_output: Option<PathBuf>,
    pub document: PathBuf,
    /// Rewrite the output table after every query.
    pub checkpoint: bool,
    pub skip_evaluation: bool,
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            csv_file: PathBuf::from(&config.csv_file),
            output: config.output.as_ref().map(PathBuf::from),
            scored_output: config.scored_output.as_ref().map(PathBuf::from),
            document: PathBuf::from(&config.document),
            checkpoint: config.checkpoint,
            skip_evaluation: config.skip_evaluation,
        }
    }
}

impl PipelineOptions {
    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.csv_file)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineOutcome {
    pub results: Vec<ResultRow>,
    /// Scored rows, when evaluation ran.
    pub scored: Option<Vec<ResultRow>>,
}

/// Runs the whole flow and deletes `agent` afterwards, whatever happened.
/// The first failing step's error is returned once the agent is gone.
pub async fn run_pipeline(
    agent: &dyn Agent,
    evaluator: Option<&dyn GenerationEvaluator>,
    options: &PipelineOptions,
) -> Result<PipelineOutcome, CvError> {
    let outcome = run_steps(agent, evaluator, options).await;
    if let Err(err) = agent.delete().await {
        log::error!("failed to delete agent {}: {err}", agent.name());
    }
    outcome
}

async fn run_steps(
    agent: &dyn Agent,
    evaluator: Option<&dyn GenerationEvaluator>,
    options: &PipelineOptions,
) -> Result<PipelineOutcome, CvError> {
    let queries = load_queries(&options.csv_file)?;
    let output = options.output_path();
    log::info!(
        "running {} quer{} against {} with agent {}",
        queries.len(),
        if queries.len() == 1 { "y" } else { "ies" },
        options.document.display(),
        agent.name()
    );

    let mut runner = QueryRunner::new(agent);
    if options.checkpoint {
        runner = runner.with_checkpoint(output);
    }
    let results = runner.process(&queries, &options.document).await;
    save_results(&results, output)?;
    println!("\nResults saved to {}", output.display());

    if options.skip_evaluation {
        return Ok(PipelineOutcome {
            results,
            scored: None,
        });
    }
    let evaluator = evaluator.ok_or_else(|| {
        CvError::InvalidRequest("evaluation requested but no evaluator configured".to_string())
    })?;
    let scored = evaluate_results(evaluator, output, options.scored_output.as_deref()).await?;
    if let Some(path) = &options.scored_output {
        println!("\nScored results saved to {}", path.display());
    }
    Ok(PipelineOutcome {
        results,
        scored: Some(scored),
    })
}

/// Asks a single question with `document` attached.
pub async fn ask(
    agent: &dyn Agent,
    query: &str,
    document: impl AsRef<Path>,
) -> Result<String, CvError> {
    let attachment = read_file_as_binary(document)?;
    agent.run(query, &[attachment]).await
}
