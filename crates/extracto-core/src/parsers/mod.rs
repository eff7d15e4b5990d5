//! Structural parsers and their registry.

pub mod bcorrientes;
pub mod line_based;
pub mod rules;

pub use bcorrientes::CorrientesStatementParser;
pub use line_based::LineBasedParser;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ParseError;
use crate::models::config::ExtractoConfig;
use crate::models::statement::{DocumentProfile, StatementMeta, Transaction, WarningItem};
use crate::pdf::PageText;

/// Result type for parser extraction.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Intermediate structural representation shared by the parsers: the
/// document's text, page by page, before any transaction semantics.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub pages: Vec<PageText>,
}

impl RawDocument {
    pub fn from_pages(pages: Vec<PageText>) -> Self {
        Self { pages }
    }

    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Contract every structural parser satisfies.
///
/// Implementations carry no mutable state between calls, so a single
/// instance is safely shareable across threads and calls.
pub trait StructuralParser: Send + Sync {
    /// Parser name as it appears in the router trace.
    fn name(&self) -> &'static str;

    /// Self-assessed applicability in [0, 1]. Must be 0 when the profile is
    /// scanned or otherwise structurally incompatible.
    fn detect(&self, profile: &DocumentProfile) -> f32;

    /// Extract raw structural units from the document. Errors only for
    /// truly unreadable input; recoverable anomalies degrade silently.
    fn extract(&self, pdf_bytes: &[u8], profile: &DocumentProfile) -> Result<RawDocument>;

    /// Convert raw units into normalized transactions.
    fn normalize(&self, raw: &RawDocument, profile: &DocumentProfile) -> Vec<Transaction>;

    /// Best-effort metadata extraction; degrades to partially-empty.
    fn extract_meta(&self, raw: &RawDocument, profile: &DocumentProfile) -> StatementMeta;

    /// Parser-local sanity checks. Never aborts, only reports.
    fn validate(&self, transactions: &[Transaction], meta: &StatementMeta) -> Vec<WarningItem>;
}

/// Registry mapping institution code to its ordered parser set.
///
/// Registration order doubles as the tie-break order when two parsers
/// report the same applicability score.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    by_institution: HashMap<String, Vec<Arc<dyn StructuralParser>>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, institution: &str, parser: Arc<dyn StructuralParser>) {
        self.by_institution
            .entry(institution.to_string())
            .or_default()
            .push(parser);
    }

    pub fn parsers_for(&self, institution: &str) -> &[Arc<dyn StructuralParser>] {
        self.by_institution
            .get(institution)
            .map(|parsers| parsers.as_slice())
            .unwrap_or(&[])
    }
}

/// Registry with the known institution parsers: the institution-tuned
/// parser first, the generic line parser as fallback.
pub fn default_registry(config: &ExtractoConfig) -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register(
        "bcorrientes",
        Arc::new(CorrientesStatementParser::new(config)),
    );
    registry.register("bcorrientes", Arc::new(LineBasedParser::new(config)));
    registry
}
