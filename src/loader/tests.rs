use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::test_support::write_sample_pdf;

struct FixedLoader {
    name: &'static str,
    outcome: Result<Vec<&'static str>, &'static str>,
    calls: Arc<AtomicUsize>,
}

impl FixedLoader {
    fn new(
        name: &'static str,
        outcome: Result<Vec<&'static str>, &'static str>,
    ) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                outcome,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl DocumentLoader for FixedLoader {
    fn name(&self) -> &'static str {
        self.name
    }

    fn load(&self, _path: &Path) -> Result<Vec<LoadedElement>, CvError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(texts) => Ok(texts
                .iter()
                .map(|t| LoadedElement {
                    text: t.to_string(),
                    page: None,
                    source: self.name,
                })
                .collect()),
            Err(msg) => Err(CvError::Extraction(msg.to_string())),
        }
    }
}

struct PanickingLoader;

impl DocumentLoader for PanickingLoader {
    fn name(&self) -> &'static str {
        "panicky"
    }

    fn load(&self, _path: &Path) -> Result<Vec<LoadedElement>, CvError> {
        panic!("malformed xref")
    }
}

fn existing_file() -> tempfile::NamedTempFile {
    tempfile::NamedTempFile::new().unwrap()
}

#[test]
fn first_successful_loader_wins() {
    let file = existing_file();
    let (first, first_calls) = FixedLoader::new("first", Ok(vec!["Jane Doe"]));
    let (second, second_calls) = FixedLoader::new("second", Ok(vec!["unused"]));
    let mut pipeline = PipelineLoader::new();
    pipeline.add_loader(first);
    pipeline.add_loader(second);

    let elements = pipeline.load(file.path()).unwrap();

    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "Jane Doe");
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn falls_back_on_error_and_blank_output() {
    let file = existing_file();
    let (broken, _) = FixedLoader::new("broken", Err("bad xref"));
    let (blank, _) = FixedLoader::new("blank", Ok(vec!["  ", "\n"]));
    let (good, _) = FixedLoader::new("good", Ok(vec!["Experience", "Education"]));
    let mut pipeline = PipelineLoader::new();
    pipeline.add_loader(broken);
    pipeline.add_loader(blank);
    pipeline.add_loader(good);

    let elements = pipeline.load(file.path()).unwrap();

    assert_eq!(elements.len(), 2);
    assert!(elements.iter().all(|e| e.source == "good"));
}

#[test]
fn reports_every_backend_when_all_fail() {
    let file = existing_file();
    let (broken, _) = FixedLoader::new("broken", Err("bad xref"));
    let mut pipeline = PipelineLoader::new();
    pipeline.add_loader(broken);
    pipeline.add_loader(PanickingLoader);

    let err = pipeline.load(file.path()).unwrap_err().to_string();

    assert!(err.contains("broken: bad xref"), "{err}");
    assert!(err.contains("panicky"), "{err}");
}

#[test]
fn missing_file_short_circuits() {
    let (loader, calls) = FixedLoader::new("never", Ok(vec!["x"]));
    let mut pipeline = PipelineLoader::new();
    pipeline.add_loader(loader);

    let err = pipeline.load("/definitely/not/here.pdf").unwrap_err();

    assert!(err.to_string().starts_with("file not found"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn empty_pipeline_is_an_error() {
    let file = existing_file();
    let err = PipelineLoader::new().load(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "no loaders configured");
}

#[test]
fn default_chain_order() {
    assert_eq!(
        PipelineLoader::default_pdf().loader_names(),
        vec!["pdf-extract", "lopdf"]
    );
}

#[test]
fn lopdf_reads_generated_pdf_by_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cv.pdf");
    write_sample_pdf(&path, &["Jane Doe", "Rust Engineer"]);

    let elements = LopdfLoader.load(&path).unwrap();

    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].page, Some(1));
    assert!(elements[0].text.contains("Jane Doe"), "{:?}", elements[0].text);
}

#[test]
fn pdf_extract_reads_generated_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cv.pdf");
    write_sample_pdf(&path, &["Jane Doe", "Rust Engineer"]);

    let elements = PdfExtractLoader.load(&path).unwrap();

    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].source, "pdf-extract");
    assert!(elements[0].text.contains("Jane Doe"), "{:?}", elements[0].text);
    assert!(elements[0].text.contains("Rust Engineer"), "{:?}", elements[0].text);
}

#[test]
fn garbage_bytes_fail_both_backends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not-a.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    let err = PipelineLoader::default_pdf().load(&path).unwrap_err().to_string();

    assert!(err.contains("pdf-extract"), "{err}");
    assert!(err.contains("lopdf"), "{err}");
}
