use std::path::Path;

use crate::error::CvError;

use super::{DocumentLoader, LoadedElement};

/// Whole-document text extraction through the `pdf-extract` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractLoader;

impl DocumentLoader for PdfExtractLoader {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn load(&self, path: &Path) -> Result<Vec<LoadedElement>, CvError> {
        let text = pdf_extract::extract_text(path)
            .map_err(|e| CvError::Extraction(e.to_string()))?;
        Ok(vec![LoadedElement {
            text,
            page: None,
            source: self.name(),
        }])
    }
}
