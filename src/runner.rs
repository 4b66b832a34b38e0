//! Runs a table of queries against an agent with a document attached.

use std::path::{Path, PathBuf};

use crate::agent::{Agent, Attachment};
use crate::dataset::{save_results, QueryRow, ResultRow};
use crate::error::CvError;

/// Reads `path` into an attachment named after its last path component.
pub fn read_file_as_binary(path: impl AsRef<Path>) -> Result<Attachment, CvError> {
    let path = path.as_ref();
    let content = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Attachment { filename, content })
}

/// Sends queries one at a time and collects the answers.
pub struct QueryRunner<'a> {
    agent: &'a dyn Agent,
    checkpoint: Option<PathBuf>,
}

impl<'a> QueryRunner<'a> {
    pub fn new(agent: &'a dyn Agent) -> Self {
        Self {
            agent,
            checkpoint: None,
        }
    }

    /// Rewrites the result table at `path` after every processed query.
    pub fn with_checkpoint(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint = Some(path.into());
        self
    }

    /// Returns one row per query. A failed query keeps `Error: <message>` as
    /// its answer; an unreadable document yields no rows at all.
    pub async fn process(&self, queries: &[QueryRow], document: impl AsRef<Path>) -> Vec<ResultRow> {
        let document = document.as_ref();
        let attachment = match read_file_as_binary(document) {
            Ok(attachment) => attachment,
            Err(err) => {
                log::error!("Error reading file {}: {err}", document.display());
                return Vec::new();
            }
        };
        let files = [attachment];

        let mut results = Vec::with_capacity(queries.len());
        for (idx, row) in queries.iter().enumerate() {
            log::info!("Processing query {}/{}: {}", idx + 1, queries.len(), row.query);
            let generated = match self.agent.run(&row.query, &files).await {
                Ok(answer) => answer,
                Err(err) => {
                    log::error!("Error processing query '{}': {err}", row.query);
                    format!("Error: {err}")
                }
            };
            results.push(ResultRow::new(row, generated));

            if let Some(path) = &self.checkpoint {
                if let Err(err) = save_results(&results, path) {
                    log::warn!("checkpoint write to {} failed: {err}", path.display());
                }
            }
        }
        results
    }
}

pub async fn process_queries(
    agent: &dyn Agent,
    queries: &[QueryRow],
    document: impl AsRef<Path>,
) -> Vec<ResultRow> {
    QueryRunner::new(agent).process(queries, document).await
}
