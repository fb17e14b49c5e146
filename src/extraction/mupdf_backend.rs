use mupdf::{Document, TextPageFlags};

use crate::errors::ExtractionError;
use crate::extraction::PdfBackend;

/// MuPDF-based implementation of [`PdfBackend`].
///
/// Reads every text block line by line, in reading order, one string per
/// page. Characters MuPDF cannot map to Unicode become U+FFFD.
#[derive(Debug, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_pages(&self, content: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let document =
            Document::from_bytes(content, "application/pdf").map_err(|e| ExtractionError::Open(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| ExtractionError::Extraction(e.to_string()))?
        {
            let page = page_result.map_err(|e| ExtractionError::Extraction(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| ExtractionError::Extraction(e.to_string()))?;

            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    page_text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        Ok(pages_text)
    }

    fn name(&self) -> &str {
        "mupdf"
    }
}
