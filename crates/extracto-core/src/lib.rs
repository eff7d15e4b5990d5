//! Core library for bank statement extraction.
//!
//! This crate turns a bank-statement PDF of unknown layout into typed
//! ledger transactions with an honest confidence signal:
//! - Document profiling (fingerprint, page count, text sample, hints)
//! - Institution detection from a fragment table
//! - Structural parsers routed by applicability score, with failure
//!   isolation and fallback
//! - Balance-consistency validation that corrects amount signs from
//!   running balances
//!
//! One document in, one [`ExtractionResult`] out. The pipeline is a pure
//! synchronous call with no shared state, so callers can run it from as
//! many threads as they like.

pub mod error;
pub mod institutions;
pub mod models;
pub mod parsers;
pub mod pdf;
pub mod router;
pub mod validation;

pub use error::{ExtractoError, ParseError, PdfError, Result};
pub use institutions::detect_institution;
pub use models::config::ExtractoConfig;
pub use models::statement::{
    CategoryHint, DocumentProfile, DocumentType, ExtractionResult, Severity, StatementMeta,
    Transaction, TypeHint, WarningCode, WarningItem,
};
pub use parsers::{
    default_registry, CorrientesStatementParser, LineBasedParser, ParserRegistry, RawDocument,
    StructuralParser,
};
pub use pdf::{profile_document, PageText, PdfDocument};
pub use router::ParserRouter;
pub use validation::check_balance_consistency;

use std::time::Instant;

use tracing::info;

/// Extract a statement with the default configuration and parser registry.
///
/// The single entry point host applications need. Fails only when the
/// bytes cannot be opened as a PDF; every other anomaly is reported as a
/// warning on the result.
pub fn extract_statement(pdf_bytes: &[u8], file_name: &str) -> Result<ExtractionResult> {
    let config = ExtractoConfig::default();
    let registry = default_registry(&config);
    extract_statement_with(pdf_bytes, file_name, &config, registry)
}

/// Extract a statement with explicit configuration and registry.
pub fn extract_statement_with(
    pdf_bytes: &[u8],
    file_name: &str,
    config: &ExtractoConfig,
    registry: ParserRegistry,
) -> Result<ExtractionResult> {
    let start = Instant::now();

    let profile = pdf::profile_document(pdf_bytes, file_name, &config.profiler)
        .map_err(ExtractoError::Pdf)?;
    info!(
        "profiled '{}': {} pages, hash {}",
        profile.file_name, profile.page_count, profile.content_hash
    );

    let router = ParserRouter::new(registry, config.validation.clone());
    let mut result = router.route(pdf_bytes, profile);
    result.processing_time_ms = start.elapsed().as_millis() as u64;

    info!(
        "extracted {} transactions with confidence {} in {}ms",
        result.transactions.len(),
        result.confidence,
        result.processing_time_ms
    );
    Ok(result)
}
