//! Document profiling: fingerprint, shape and content hints.

use sha2::{Digest, Sha256};
use tracing::debug;

use super::{PdfDocument, Result};
use crate::models::config::ProfilerConfig;
use crate::models::statement::{DocumentProfile, DocumentType};

/// Build a [`DocumentProfile`] from raw bytes.
///
/// This is the single point where the pipeline may fail hard: a byte stream
/// that cannot be opened as a PDF yields an error, because no meaningful
/// profile can be built. Everything downstream degrades to warnings.
pub fn profile_document(
    pdf_bytes: &[u8],
    file_name: &str,
    config: &ProfilerConfig,
) -> Result<DocumentProfile> {
    let content_hash = hash_bytes(pdf_bytes);

    let document = PdfDocument::load(pdf_bytes)?;
    let page_count = document.page_count();
    let sample_text = document.sample_text(config.sample_pages);

    let is_text_extractable = !sample_text.trim().is_empty();
    let hints = ContentHints::from_sample(&sample_text);

    debug!(
        "profiled '{}': {} pages, text={}, type={:?}",
        file_name, page_count, is_text_extractable, hints.document_type
    );

    Ok(DocumentProfile {
        file_name: file_name.to_string(),
        content_hash,
        page_count,
        is_text_extractable,
        is_scanned: !is_text_extractable,
        sample_text,
        language_hint: config.language_hint.clone(),
        document_type: hints.document_type,
        has_balance_keyword: hints.has_balance_keyword,
        has_account_keyword: hints.has_account_keyword,
        has_period_keyword: hints.has_period_keyword,
        institution: None,
    })
}

/// SHA-256 hex digest of the full byte content.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

struct ContentHints {
    has_balance_keyword: bool,
    has_account_keyword: bool,
    has_period_keyword: bool,
    document_type: DocumentType,
}

impl ContentHints {
    fn from_sample(sample: &str) -> Self {
        let lowered = sample.to_lowercase();

        let has_balance_keyword = lowered.contains("saldo");
        let has_account_keyword = lowered.contains("cbu");
        let has_period_keyword = lowered.contains("periodo") || lowered.contains("período");

        // A pure balance summary announces itself with all three signals;
        // anything else is treated as a movement listing.
        let document_type =
            if lowered.contains("resumen") && has_balance_keyword && has_period_keyword {
                DocumentType::BalanceSummary
            } else {
                DocumentType::MovementList
            };

        Self {
            has_balance_keyword,
            has_account_keyword,
            has_period_keyword,
            document_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;

    #[test]
    fn malformed_bytes_raise() {
        let err = profile_document(b"\x00\x01\x02", "x.pdf", &ProfilerConfig::default());
        assert!(matches!(err, Err(PdfError::Malformed(_))));
    }

    #[test]
    fn hash_is_deterministic_and_content_sensitive() {
        assert_eq!(hash_bytes(b"abc"), hash_bytes(b"abc"));
        assert_ne!(hash_bytes(b"abc"), hash_bytes(b"abd"));
        assert_eq!(hash_bytes(b"abc").len(), 64);
    }

    #[test]
    fn summary_needs_all_three_signals() {
        let hints = ContentHints::from_sample(
            "RESUMEN DE CUENTA\nPeriodo: 01/01/24 al 31/01/24\nSALDO FINAL 100,00",
        );
        assert_eq!(hints.document_type, DocumentType::BalanceSummary);

        // Missing the period keyword
        let hints = ContentHints::from_sample("RESUMEN DE CUENTA\nSALDO FINAL 100,00");
        assert_eq!(hints.document_type, DocumentType::MovementList);
    }

    #[test]
    fn keyword_hints_are_case_insensitive() {
        let hints = ContentHints::from_sample("Saldo anterior\nCBU 012345\nPERÍODO");
        assert!(hints.has_balance_keyword);
        assert!(hints.has_account_keyword);
        assert!(hints.has_period_keyword);
    }
}
