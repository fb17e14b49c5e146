/*!
 * Common test utilities for the eduspeak test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

use eduspeak::errors::ExtractionError;
use eduspeak::extraction::{Extractor, PdfBackend};
use eduspeak::pipeline::Pipeline;
use eduspeak::providers::mock::MockProvider;
use eduspeak::speech::SpeechSynthesizer;
use eduspeak::summarization::Summarizer;
use eduspeak::translation::PromptedTranslator;

static LOGGER: Once = Once::new();

/// Route library logs through env_logger (RUST_LOG) once per test binary
pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a file that passes the PDF signature check
pub fn create_test_pdf(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, b"%PDF-1.7\n%test document\n")
}

/// `n` distinct words: "w0 w1 ... w(n-1)"
pub fn numbered_words(n: usize) -> String {
    (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
}

/// PDF backend returning fixed pages whatever the input bytes
pub struct FakePdf {
    pages: Vec<String>,
}

impl FakePdf {
    pub fn with_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn with_text(text: &str) -> Self {
        Self::with_pages(vec![text.to_string()])
    }

    pub fn empty() -> Self {
        Self::with_pages(Vec::new())
    }
}

impl PdfBackend for FakePdf {
    fn extract_pages(&self, _content: &[u8]) -> Result<Vec<String>, ExtractionError> {
        Ok(self.pages.clone())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// PDF backend that cannot read anything
pub struct UnreadablePdf;

impl PdfBackend for UnreadablePdf {
    fn extract_pages(&self, _content: &[u8]) -> Result<Vec<String>, ExtractionError> {
        Err(ExtractionError::Open("cannot find startxref".to_string()))
    }

    fn name(&self) -> &str {
        "unreadable"
    }
}

/// Mocks used by one pipeline, kept to inspect call counts afterwards
pub struct MockStages {
    pub summarization: MockProvider,
    pub translation: MockProvider,
    pub speech: MockProvider,
}

impl MockStages {
    pub fn working() -> Self {
        Self {
            summarization: MockProvider::working(),
            translation: MockProvider::working(),
            speech: MockProvider::working(),
        }
    }

    /// Pipeline over `backend` using clones of these mocks
    pub fn pipeline(&self, backend: impl PdfBackend + 'static, max_tokens: usize) -> Pipeline {
        Pipeline::new(
            Extractor::new(Box::new(backend)),
            Summarizer::new(Box::new(self.summarization.clone())).with_max_tokens(max_tokens),
            Box::new(PromptedTranslator::new(Box::new(self.translation.clone()))),
            SpeechSynthesizer::new(Box::new(self.speech.clone())),
        )
    }
}
