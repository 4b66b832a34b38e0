//! Document loaders used by the PDF reader tool.
//!
//! A [`PipelineLoader`] holds an ordered list of extraction backends and
//! falls back to the next one whenever a backend fails or produces no text.

mod extract;
mod pages;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use crate::error::CvError;

pub use extract::PdfExtractLoader;
pub use pages::LopdfLoader;

/// A block of text extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedElement {
    /// Extracted text
    pub text: String,
    /// 1-based page number, when the backend works page by page
    pub page: Option<u32>,
    /// Name of the backend that produced the element
    pub source: &'static str,
}

/// A text extraction backend.
pub trait DocumentLoader: Send + Sync {
    /// Short backend name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Extracts text elements from the document at `path`.
    fn load(&self, path: &Path) -> Result<Vec<LoadedElement>, CvError>;
}

/// Ordered chain of fallback loaders.
#[derive(Default)]
pub struct PipelineLoader {
    loaders: Vec<Box<dyn DocumentLoader>>,
}

impl PipelineLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The PDF chain: `pdf-extract` first, then page-wise `lopdf`.
    pub fn default_pdf() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_loader(PdfExtractLoader);
        pipeline.add_loader(LopdfLoader);
        pipeline
    }

    /// Appends a loader to the end of the chain.
    pub fn add_loader(&mut self, loader: impl DocumentLoader + 'static) {
        self.loaders.push(Box::new(loader));
    }

    pub fn loader_names(&self) -> Vec<&'static str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    /// Runs the chain and returns the elements of the first backend that
    /// yields non-blank text.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<LoadedElement>, CvError> {
        let path = path.as_ref();
        if self.loaders.is_empty() {
            return Err(CvError::Extraction("no loaders configured".to_string()));
        }
        if !path.is_file() {
            return Err(CvError::Extraction(format!(
                "file not found: {}",
                path.display()
            )));
        }

        log::debug!("loading {} with {:?}", path.display(), self.loader_names());
        let mut failures = Vec::with_capacity(self.loaders.len());
        for loader in &self.loaders {
            match run_loader(loader.as_ref(), path) {
                Ok(elements) if elements.iter().any(|e| !e.text.trim().is_empty()) => {
                    log::debug!(
                        "{} extracted {} element(s) from {}",
                        loader.name(),
                        elements.len(),
                        path.display()
                    );
                    return Ok(elements);
                }
                Ok(_) => {
                    log::debug!("{} found no text in {}", loader.name(), path.display());
                    failures.push(format!("{}: no text extracted", loader.name()));
                }
                Err(err) => {
                    log::debug!("{} failed on {}: {err}", loader.name(), path.display());
                    failures.push(format!("{}: {err}", loader.name()));
                }
            }
        }

        Err(CvError::Extraction(format!(
            "all loaders failed for {} ({})",
            path.display(),
            failures.join("; ")
        )))
    }
}

// Extraction crates can panic on malformed input; a panic counts as a failure
// of that backend only.
fn run_loader(loader: &dyn DocumentLoader, path: &Path) -> Result<Vec<LoadedElement>, CvError> {
    catch_unwind(AssertUnwindSafe(|| loader.load(path))).unwrap_or_else(|_| {
        Err(CvError::Extraction(format!(
            "{} panicked while parsing the document",
            loader.name()
        )))
    })
}

#[cfg(test)]
mod tests;
