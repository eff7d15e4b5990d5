//! Error types for the extracto-core library.

use thiserror::Error;

/// Main error type for the extracto library.
///
/// Almost every anomaly in the pipeline is reported as a
/// [`WarningItem`](crate::models::statement::WarningItem) on the result
/// instead of an error; only a document that cannot be opened as a PDF at
/// all propagates to the caller.
#[derive(Error, Debug)]
pub enum ExtractoError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The byte stream is not a readable PDF document.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised by a structural parser's `extract` step.
///
/// These never reach the caller: the router records a `PARSER_FAILED`
/// warning and moves on to the next candidate.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Underlying PDF failure while re-reading the document.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// The document structure could not be read at all.
    #[error("unreadable input: {0}")]
    Unreadable(String),
}

/// Result type for the extracto library.
pub type Result<T> = std::result::Result<T, ExtractoError>;
