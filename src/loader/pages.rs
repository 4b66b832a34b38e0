use std::path::Path;

use lopdf::Document;

use crate::error::CvError;

use super::{DocumentLoader, LoadedElement};

/// Page-by-page text extraction through `lopdf`.
///
/// Produces one element per page that carries any text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfLoader;

impl DocumentLoader for LopdfLoader {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn load(&self, path: &Path) -> Result<Vec<LoadedElement>, CvError> {
        let document =
            Document::load(path).map_err(|e| CvError::Extraction(e.to_string()))?;

        let mut elements = Vec::new();
        for page_number in document.get_pages().keys().copied() {
            let text = document
                .extract_text(&[page_number])
                .map_err(|e| CvError::Extraction(format!("page {page_number}: {e}")))?;
            if text.trim().is_empty() {
                continue;
            }
            elements.push(LoadedElement {
                text,
                page: Some(page_number),
                source: self.name(),
            });
        }
        Ok(elements)
    }
}
