//! PDF access layer using lopdf and pdf-extract.

mod profiler;

pub use profiler::profile_document;

use lopdf::Document;
use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text content of a single page (1-indexed).
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

/// A loaded PDF document.
#[derive(Debug)]
pub struct PdfDocument {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfDocument {
    /// Load a PDF from bytes. This is the only place the pipeline can fail
    /// hard: bytes that are not a readable PDF produce
    /// [`PdfError::Malformed`].
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Malformed(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Malformed(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("loaded PDF with {} pages", page_count);
        Ok(Self {
            document: doc,
            raw_data,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Extract text from a single page (1-indexed).
    pub fn page_text(&self, page: u32) -> Result<String> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }
        self.document
            .extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Text of the first `pages` pages, joined. Sampling keeps profiling
    /// cheap on long documents.
    pub fn sample_text(&self, pages: usize) -> String {
        let take = (pages as u32).min(self.page_count());

        let mut parts = Vec::new();
        for page in 1..=take {
            match self.page_text(page) {
                Ok(text) if !text.trim().is_empty() => parts.push(text),
                Ok(_) => {}
                Err(e) => debug!("text extraction failed on page {}: {}", page, e),
            }
        }

        if parts.is_empty() {
            parts = self
                .fallback_page_texts()
                .into_iter()
                .take(take as usize)
                .map(|p| p.text)
                .filter(|t| !t.trim().is_empty())
                .collect();
        }

        parts.join("\n")
    }

    /// Per-page text for the whole document. Pages whose text cannot be
    /// extracted come back empty; when every page is empty the whole
    /// document is retried through pdf-extract.
    pub fn page_texts(&self) -> Vec<PageText> {
        let count = self.page_count();
        let pages: Vec<PageText> = (1..=count)
            .map(|number| PageText {
                number,
                text: self.page_text(number).unwrap_or_default(),
            })
            .collect();

        if pages.iter().all(|p| p.text.trim().is_empty()) {
            let fallback = self.fallback_page_texts();
            if fallback.iter().any(|p| !p.text.trim().is_empty()) {
                debug!("lopdf text extraction came back empty, using pdf-extract fallback");
                return fallback;
            }
        }

        pages
    }

    /// Whole-document extraction via pdf-extract, split evenly across pages
    /// by line count. Page attribution is approximate here, which is why
    /// this is only a fallback.
    fn fallback_page_texts(&self) -> Vec<PageText> {
        let full_text = match pdf_extract::extract_text_from_mem(&self.raw_data) {
            Ok(text) => text,
            Err(e) => {
                debug!("pdf-extract fallback failed: {}", e);
                return Vec::new();
            }
        };

        let count = self.page_count() as usize;
        if count == 0 {
            return Vec::new();
        }

        let lines: Vec<&str> = full_text.lines().collect();
        let lines_per_page = (lines.len() / count).max(1);

        (0..count)
            .map(|idx| {
                let start = (idx * lines_per_page).min(lines.len());
                let end = if idx == count - 1 {
                    lines.len()
                } else {
                    ((idx + 1) * lines_per_page).min(lines.len())
                };
                PageText {
                    number: (idx + 1) as u32,
                    text: lines[start..end].join("\n"),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_malformed() {
        let err = PdfDocument::load(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Malformed(_)));
    }
}
