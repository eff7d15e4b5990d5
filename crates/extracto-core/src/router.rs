//! Parser routing: rank candidates, execute with failure isolation.
//!
//! Applicability scores are heuristic estimates, not guarantees. A
//! higher-scoring parser can still blow up on a format outlier, so the
//! router degrades to the next best guess instead of aborting, and keeps
//! an audit trace of everything it tried.

use std::cmp::Ordering;

use tracing::{info, warn};

use crate::institutions::detect_institution;
use crate::models::config::ValidationConfig;
use crate::models::statement::{
    DocumentProfile, DocumentType, ExtractionResult, Severity, WarningCode, WarningItem,
};
use crate::parsers::ParserRegistry;
use crate::validation::check_balance_consistency;

/// Routes a profiled document through the registered parsers.
pub struct ParserRouter {
    registry: ParserRegistry,
    validation: ValidationConfig,
}

impl ParserRouter {
    pub fn new(registry: ParserRegistry, validation: ValidationConfig) -> Self {
        Self {
            registry,
            validation,
        }
    }

    /// Resolve the institution, rank its parsers, and run them in order
    /// until one succeeds. Never fails: every anomaly short of a malformed
    /// document becomes a warning on the result.
    pub fn route(&self, pdf_bytes: &[u8], mut profile: DocumentProfile) -> ExtractionResult {
        let mut warnings: Vec<WarningItem> = Vec::new();
        let mut trace: Vec<String> = Vec::new();

        let Some(institution) = detect_institution(&profile) else {
            trace.push("INSTITUTION_DETECTION_FAILED".to_string());
            warnings.push(WarningItem::new(
                WarningCode::InstitutionNotDetected,
                Severity::Critical,
                "could not detect the issuing institution",
            ));
            return ExtractionResult::empty(profile, warnings, trace);
        };

        profile.institution = Some(institution.to_string());
        trace.push(format!("INSTITUTION:{}", institution));

        let parsers = self.registry.parsers_for(institution);
        if parsers.is_empty() {
            warnings.push(WarningItem::new(
                WarningCode::NoParserForInstitution,
                Severity::Critical,
                format!("no parser registered for institution '{}'", institution),
            ));
            return ExtractionResult::empty(profile, warnings, trace);
        }

        // Stable sort: equal scores keep registration order.
        let mut scored: Vec<(f32, usize)> = parsers
            .iter()
            .enumerate()
            .map(|(idx, parser)| (parser.detect(&profile), idx))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        for (score, idx) in scored {
            if score <= 0.0 {
                continue;
            }
            let parser = &parsers[idx];

            trace.push(format!("TRY:{}", parser.name()));
            info!("trying parser {} (score {:.2})", parser.name(), score);

            let raw = match parser.extract(pdf_bytes, &profile) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("parser {} failed: {}", parser.name(), e);
                    warnings.push(WarningItem::new(
                        WarningCode::ParserFailed,
                        Severity::High,
                        e.to_string(),
                    ));
                    trace.push(format!("FAIL:{}", parser.name()));
                    continue;
                }
            };

            let mut transactions = parser.normalize(&raw, &profile);
            let meta = parser.extract_meta(&raw, &profile);
            warnings.extend(parser.validate(&transactions, &meta));

            // Generic balance validation only makes sense on movement
            // listings; a pure balance summary has nothing to walk.
            let balance_score = if profile.document_type != DocumentType::BalanceSummary {
                let (balance_warnings, score) = check_balance_consistency(
                    &mut transactions,
                    self.validation.amount_tolerance,
                );
                warnings.extend(balance_warnings);
                score
            } else {
                100
            };

            trace.push(format!("OK:{}", parser.name()));
            let confidence = ((score * 100.0 + balance_score as f32) / 2.0).round() as u8;

            return ExtractionResult {
                profile,
                transactions,
                meta: Some(meta),
                warnings,
                confidence,
                parser_trace: trace,
                processing_time_ms: 0,
            };
        }

        // Every candidate failed or scored zero.
        ExtractionResult::empty(profile, warnings, trace)
    }
}
