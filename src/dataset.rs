//! CSV tables of queries and generated answers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CvError;

pub const RESULT_HEADER: [&str; 3] = ["query", "generated_response", "expected_response"];

pub const SCORED_HEADER: [&str; 6] = [
    "query",
    "generated_response",
    "expected_response",
    "completeness_score",
    "redundancy_score",
    "explanation",
];

/// One input row: a question and, optionally, its reference answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryRow {
    pub query: String,
    #[serde(default)]
    pub expected_response: String,
}

impl QueryRow {
    pub fn new(query: impl Into<String>, expected_response: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            expected_response: expected_response.into(),
        }
    }
}

/// One output row, with evaluator scores once they are known.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ResultRow {
    pub query: String,
    #[serde(default)]
    pub generated_response: String,
    #[serde(default)]
    pub expected_response: String,
    #[serde(default)]
    pub completeness_score: Option<f64>,
    #[serde(default)]
    pub redundancy_score: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl ResultRow {
    pub fn new(query: &QueryRow, generated_response: impl Into<String>) -> Self {
        Self {
            query: query.query.clone(),
            generated_response: generated_response.into(),
            expected_response: query.expected_response.clone(),
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    query: &'a str,
    generated_response: String,
    expected_response: &'a str,
}

#[derive(Serialize)]
struct ScoredRecord<'a> {
    query: &'a str,
    generated_response: String,
    expected_response: &'a str,
    completeness_score: Option<f64>,
    redundancy_score: Option<f64>,
    explanation: Option<&'a str>,
}

/// Answers are stored on a single line.
pub fn normalize_response(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}

pub fn load_queries(path: impl AsRef<Path>) -> Result<Vec<QueryRow>, CvError> {
    read_rows(path.as_ref())
}

pub fn load_results(path: impl AsRef<Path>) -> Result<Vec<ResultRow>, CvError> {
    read_rows(path.as_ref())
}

pub fn save_results(rows: &[ResultRow], path: impl AsRef<Path>) -> Result<(), CvError> {
    let path = path.as_ref();
    let mut writer = open_writer(path, &RESULT_HEADER)?;
    for row in rows {
        writer.serialize(ResultRecord {
            query: &row.query,
            generated_response: normalize_response(&row.generated_response),
            expected_response: &row.expected_response,
        })?;
    }
    writer.flush()?;
    log::debug!("wrote {} row(s) to {}", rows.len(), path.display());
    Ok(())
}

pub fn save_scored_results(rows: &[ResultRow], path: impl AsRef<Path>) -> Result<(), CvError> {
    let path = path.as_ref();
    let mut writer = open_writer(path, &SCORED_HEADER)?;
    for row in rows {
        writer.serialize(ScoredRecord {
            query: &row.query,
            generated_response: normalize_response(&row.generated_response),
            expected_response: &row.expected_response,
            completeness_score: row.completeness_score,
            redundancy_score: row.redundancy_score,
            explanation: row.explanation.as_deref(),
        })?;
    }
    writer.flush()?;
    log::debug!("wrote {} scored row(s) to {}", rows.len(), path.display());
    Ok(())
}

// Short rows are accepted; their trailing columns take the field defaults.
fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, CvError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| CvError::Csv(format!("{}: {e}", path.display())))?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| CvError::Csv(format!("{}: {e}", path.display())))?;
    log::debug!("read {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

// Header is written by hand so an empty table still gets one.
fn open_writer(path: &Path, header: &[&str]) -> Result<csv::Writer<std::fs::File>, CvError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| CvError::Csv(format!("{}: {e}", path.display())))?;
    writer.write_record(header)?;
    Ok(writer)
}
