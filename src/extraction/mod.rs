/*!
 * Document text extraction.
 *
 * Turns an uploaded PDF into a single plain-text blob: every page's text in
 * document order, pages separated by a newline, surrounding whitespace
 * trimmed. Layout and markup are discarded. Decoding is delegated to a
 * `PdfBackend`; the MuPDF backend is compiled in with the `mupdf` feature.
 */

use anyhow::{Context, Result};
use bytes::Bytes;
use log::{debug, error, info};
use std::path::Path;

use crate::errors::ExtractionError;
use crate::pipeline::StageOutcome;

#[cfg(feature = "mupdf")]
pub mod mupdf_backend;

/// An uploaded document: opaque PDF bytes and a display name
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    content: Bytes,
}

impl Document {
    pub fn from_bytes(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a document from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path).with_context(|| format!("Failed to read document: {:?}", path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());
        Ok(Self::from_bytes(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Trait for PDF text extraction backends.
///
/// Implementors return the plain text of every page, in order.
pub trait PdfBackend: Send + Sync {
    fn extract_pages(&self, content: &[u8]) -> Result<Vec<String>, ExtractionError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Backend used when no PDF library is compiled in
#[derive(Debug, Default)]
pub struct UnsupportedBackend;

impl PdfBackend for UnsupportedBackend {
    fn extract_pages(&self, _content: &[u8]) -> Result<Vec<String>, ExtractionError> {
        Err(ExtractionError::Unsupported)
    }

    fn name(&self) -> &str {
        "unsupported"
    }
}

/// Join page texts with newlines and trim the result
pub fn join_pages(pages: &[String]) -> String {
    pages.join("\n").trim().to_string()
}

/// Extracts normalized text from documents
pub struct Extractor {
    backend: Box<dyn PdfBackend>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor").field("backend", &self.backend.name()).finish()
    }
}

impl Extractor {
    pub fn new(backend: Box<dyn PdfBackend>) -> Self {
        Self { backend }
    }

    /// Extractor over the MuPDF backend
    #[cfg(feature = "mupdf")]
    pub fn with_default_backend() -> Self {
        Self::new(Box::new(mupdf_backend::MupdfBackend::new()))
    }

    /// Extractor for builds without a PDF library; every document fails
    #[cfg(not(feature = "mupdf"))]
    pub fn with_default_backend() -> Self {
        Self::new(Box::new(UnsupportedBackend))
    }

    /// Extract the text of `document`, consuming it.
    ///
    /// Never fails: an unreadable, page-less or text-less document yields
    /// empty text together with the reason.
    pub fn extract(&self, document: Document) -> StageOutcome<String> {
        debug!(
            "Extracting {} ({} bytes) with {}",
            document.name(),
            document.len(),
            self.backend.name()
        );

        if document.is_empty() {
            return Self::fail(ExtractionError::Open("document is empty".to_string()));
        }

        let pages = match self.backend.extract_pages(document.content()) {
            Ok(pages) => pages,
            Err(e) => return Self::fail(e),
        };

        if pages.is_empty() {
            return Self::fail(ExtractionError::NoPages);
        }

        let text = join_pages(&pages);
        if text.is_empty() {
            return Self::fail(ExtractionError::NoText);
        }

        info!(
            "Extracted {} characters from {} page(s) of {}",
            text.chars().count(),
            pages.len(),
            document.name()
        );
        StageOutcome::completed(text)
    }

    fn fail(error: ExtractionError) -> StageOutcome<String> {
        error!("Error extracting text: {}", error);
        StageOutcome::degraded(String::new(), error)
    }
}
