//! Data model for extracted bank statements.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coarse classification of the statement document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Chronological listing of individual movements.
    MovementList,
    /// Aggregate opening/closing balances without line-item detail.
    BalanceSummary,
    /// Could not be classified.
    Unknown,
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Identity and shape of an ingested document.
///
/// Built once per call by the profiler; immutable afterwards except for
/// `institution`, which the router sets exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentProfile {
    /// Original file name (diagnostics only, never parsed for meaning).
    pub file_name: String,

    /// SHA-256 hex digest over the full byte content. Suitable as a
    /// caller-side cache/dedup key.
    pub content_hash: String,

    /// Number of pages in the document.
    pub page_count: u32,

    /// True when the text sample is non-empty after trimming.
    pub is_text_extractable: bool,

    /// Always the negation of `is_text_extractable`.
    pub is_scanned: bool,

    /// Text extracted from the first pages (sampling, not full-document).
    pub sample_text: String,

    /// Expected language of the statement text.
    pub language_hint: String,

    /// Coarse document classification.
    pub document_type: DocumentType,

    /// Sample mentions a balance term ("saldo").
    pub has_balance_keyword: bool,

    /// Sample mentions an account identifier term ("cbu").
    pub has_account_keyword: bool,

    /// Sample mentions a statement period term.
    pub has_period_keyword: bool,

    /// Institution code resolved during routing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
}

/// Debit/credit direction guessed from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeHint {
    Debit,
    Credit,
}

/// Coarse movement category guessed from the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryHint {
    /// Taxes and levies.
    Tax,
    /// Bank fees and maintenance charges.
    Fee,
    /// Incoming/outgoing transfers.
    Transfer,
    /// Card purchases and automatic debits.
    Card,
}

/// One normalized ledger movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Movement date.
    pub date: NaiveDate,

    /// Free-text description, possibly merged from continuation lines.
    pub description: String,

    /// Signed amount in currency units. `None` when the source line carried
    /// only a running balance; the balance validator fills it from the
    /// balance delta when the neighbours are known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Running balance immediately after this movement, as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,

    /// Currency code (e.g. "ARS").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Debit/credit guess.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<TypeHint>,

    /// Category guess.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_hint: Option<CategoryHint>,

    /// Page the movement was read from (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_page: Option<u32>,

    /// Raw source line, for audit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_raw: Option<String>,
}

/// Document-level statement facts. Every field is optional: a given
/// institution's format may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_balance: Option<Decimal>,
}

/// Warning severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Med,
    High,
    Critical,
}

/// Warning taxonomy. Warnings never abort the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// No institution fragment matched the sample text.
    InstitutionNotDetected,
    /// Institution resolved but no parser registered for it.
    NoParserForInstitution,
    /// A candidate parser raised during extraction.
    ParserFailed,
    /// A parser succeeded structurally but produced an empty sequence.
    NoTransactions,
    /// Movements parsed without a running balance.
    MissingBalance,
    /// Arithmetic inconsistency between consecutive balances.
    BalanceMismatch,
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InstitutionNotDetected => "INSTITUTION_NOT_DETECTED",
            Self::NoParserForInstitution => "NO_PARSER_FOR_INSTITUTION",
            Self::ParserFailed => "PARSER_FAILED",
            Self::NoTransactions => "NO_TRANSACTIONS",
            Self::MissingBalance => "MISSING_BALANCE",
            Self::BalanceMismatch => "BALANCE_MISMATCH",
        };
        f.write_str(name)
    }
}

/// A single validation/diagnostic finding attached to the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningItem {
    pub code: WarningCode,
    pub severity: Severity,
    pub message: String,

    /// Pages the finding refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<u32>>,

    /// Structured evidence, e.g. expected vs. actual balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<serde_json::Value>,
}

impl WarningItem {
    pub fn new(code: WarningCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            pages: None,
            evidence: None,
        }
    }

    pub fn with_pages(mut self, pages: Vec<u32>) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_evidence(mut self, evidence: serde_json::Value) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

/// Terminal aggregate returned to the caller. The core keeps no reference
/// to past results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Profile of the ingested document.
    pub profile: DocumentProfile,

    /// Normalized movements, in statement order (chronological after the
    /// balance validator has run).
    pub transactions: Vec<Transaction>,

    /// Document-level metadata, when a parser produced any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<StatementMeta>,

    /// Findings accumulated across the pipeline.
    pub warnings: Vec<WarningItem>,

    /// Blend of parser applicability and balance consistency, 0-100.
    pub confidence: u8,

    /// Ordered audit log of attempted parsers and outcomes.
    pub parser_trace: Vec<String>,

    /// Wall-clock processing time.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// An empty result carrying only the profile and diagnostics. Used by
    /// the router whenever no parser produced transactions.
    pub fn empty(
        profile: DocumentProfile,
        warnings: Vec<WarningItem>,
        parser_trace: Vec<String>,
    ) -> Self {
        Self {
            profile,
            transactions: Vec::new(),
            meta: None,
            warnings,
            confidence: 0,
            parser_trace,
            processing_time_ms: 0,
        }
    }

    /// True when any warning is `Critical`.
    pub fn has_critical_warnings(&self) -> bool {
        self.warnings.iter().any(|w| w.severity == Severity::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Med);
        assert!(Severity::Med > Severity::Low);
    }

    #[test]
    fn warning_serializes_with_screaming_code() {
        let w = WarningItem::new(
            WarningCode::BalanceMismatch,
            Severity::High,
            "inconsistent balance",
        );
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["code"], "BALANCE_MISMATCH");
        assert_eq!(json["severity"], "HIGH");
        assert_eq!(w.code.to_string(), "BALANCE_MISMATCH");
    }

    #[test]
    fn empty_result_has_zero_confidence() {
        let profile = DocumentProfile {
            file_name: "x.pdf".into(),
            content_hash: "00".into(),
            page_count: 1,
            is_text_extractable: true,
            is_scanned: false,
            sample_text: String::new(),
            language_hint: "es-AR".into(),
            document_type: DocumentType::Unknown,
            has_balance_keyword: false,
            has_account_keyword: false,
            has_period_keyword: false,
            institution: None,
        };
        let result = ExtractionResult::empty(profile, Vec::new(), Vec::new());
        assert_eq!(result.confidence, 0);
        assert!(result.transactions.is_empty());
    }
}
