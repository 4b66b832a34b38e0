//! PDF reader tool for CV/resume files.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::loader::PipelineLoader;

use super::context::ToolContext;
use super::definition::{ToolDefinition, ToolParam};
use super::error::ToolError;

pub const PDF_READER_TOOL_NAME: &str = "pdf_reader_tool";

const DESCRIPTION: &str =
    "Read a PDF file and extract its text content. Input should be the path to the PDF file.";

#[derive(Debug, Deserialize)]
struct DocumentReaderInput {
    file_path: String,
}

/// Extracts the text of a PDF through a fallback chain of loaders.
pub struct PdfReaderTool {
    loader: PipelineLoader,
}

impl Default for PdfReaderTool {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfReaderTool {
    pub fn new() -> Self {
        Self::with_loader(PipelineLoader::default_pdf())
    }

    pub fn with_loader(loader: PipelineLoader) -> Self {
        Self { loader }
    }

    /// Returns the document text, or `Error reading file: ...` when extraction fails.
    pub fn run(&self, file_path: impl AsRef<Path>) -> String {
        let path = file_path.as_ref();
        match self.loader.load(path) {
            Ok(elements) => {
                let full_text = elements
                    .iter()
                    .map(|e| e.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                full_text.trim().to_string()
            }
            Err(err) => {
                log::warn!("pdf_reader_tool failed on {}: {err}", path.display());
                format!("Error reading file: {err}")
            }
        }
    }
}

/// Create the pdf_reader_tool definition.
#[must_use]
pub fn pdf_reader_tool(reader: Arc<PdfReaderTool>) -> ToolDefinition {
    ToolDefinition {
        name: PDF_READER_TOOL_NAME,
        description: DESCRIPTION,
        params: vec![ToolParam::new(
            "file_path",
            "Path to the document file to be read",
            "string",
        )],
        required: vec!["file_path"],
        executor: Arc::new(move |ctx: &ToolContext, args: Value| execute(&reader, ctx, args)),
    }
}

fn execute(reader: &PdfReaderTool, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
    let input: DocumentReaderInput =
        serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;
    Ok(reader.run(ctx.resolve(&input.file_path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CvError;
    use crate::loader::{DocumentLoader, LoadedElement};
    use serde_json::json;

    struct Paged;

    impl DocumentLoader for Paged {
        fn name(&self) -> &'static str {
            "paged"
        }

        fn load(&self, _path: &Path) -> Result<Vec<LoadedElement>, CvError> {
            Ok(["  Jane Doe", "Rust Engineer  \n"]
                .iter()
                .enumerate()
                .map(|(i, text)| LoadedElement {
                    text: text.to_string(),
                    page: Some(i as u32 + 1),
                    source: "paged",
                })
                .collect())
        }
    }

    fn paged_reader() -> PdfReaderTool {
        let mut pipeline = PipelineLoader::new();
        pipeline.add_loader(Paged);
        PdfReaderTool::with_loader(pipeline)
    }

    #[test]
    fn joins_elements_and_trims() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(paged_reader().run(file.path()), "Jane Doe\nRust Engineer");
    }

    #[test]
    fn default_chain_reads_generated_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        crate::test_support::write_sample_pdf(&path, &["Jane Doe", "Rust Engineer"]);

        assert_eq!(PdfReaderTool::new().run(&path), "Jane Doe\nRust Engineer");
    }

    #[test]
    fn missing_file_becomes_error_text() {
        let output = PdfReaderTool::new().run("/no/such/cv.pdf");
        assert!(output.starts_with("Error reading file: file not found"), "{output}");
    }

    #[test]
    fn definition_resolves_relative_paths_against_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cv.pdf"), b"%PDF-stub").unwrap();
        let tool = pdf_reader_tool(Arc::new(paged_reader()));
        let ctx = ToolContext {
            allowed_paths: Vec::new(),
            working_dir: Some(dir.path().to_path_buf()),
        };

        let output = (tool.executor)(&ctx, json!({"file_path": "cv.pdf"})).unwrap();

        assert_eq!(output, "Jane Doe\nRust Engineer");
    }

    #[test]
    fn definition_rejects_missing_argument() {
        let tool = pdf_reader_tool(Arc::new(PdfReaderTool::new()));
        let err = (tool.executor)(&ToolContext::default(), json!({})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
    }

    #[test]
    fn schema_matches_tool_contract() {
        let tool = pdf_reader_tool(Arc::new(PdfReaderTool::new())).to_tool();
        assert_eq!(tool.function.name, "pdf_reader_tool");
        assert_eq!(tool.function.description, DESCRIPTION);
        assert_eq!(tool.function.parameters["required"], json!(["file_path"]));
        assert_eq!(
            tool.function.parameters["properties"]["file_path"]["type"],
            json!("string")
        );
    }
}
