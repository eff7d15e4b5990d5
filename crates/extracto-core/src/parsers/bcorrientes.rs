//! Banco de Corrientes account statement parser.
//!
//! Tuned to the bank's resumen layout: a main ledger table (date,
//! description, movement, running balance) followed by informational
//! sections that restate movements and must not be scanned. Amounts are
//! derived from consecutive running balances, which makes the resulting
//! ledger self-consistent by construction.

use rust_decimal::Decimal;
use tracing::debug;

use super::rules::{
    category_hint, leading_date, money_tokens, parse_date_token, parse_money,
    patterns::{BALANCE_ROW, CLOSING_BALANCE, OPENING_BALANCE, PERIOD_RANGE, SECTION_BOUNDARY},
};
use super::{RawDocument, Result, StructuralParser};
use crate::models::config::ExtractoConfig;
use crate::models::statement::{
    DocumentProfile, Severity, StatementMeta, Transaction, TypeHint, WarningCode, WarningItem,
};
use crate::pdf::PdfDocument;

const NAME_FRAGMENTS: &[&str] = &["banco de corrientes", "banco de la pcia de corrientes"];

/// Parser for Banco de Corrientes resumen PDFs.
pub struct CorrientesStatementParser {
    amount_tolerance: Decimal,
}

impl CorrientesStatementParser {
    pub fn new(config: &ExtractoConfig) -> Self {
        Self {
            amount_tolerance: config.validation.amount_tolerance,
        }
    }

    /// Scan the ledger lines of one page. The running balance enters as
    /// `carry` and the updated carry is returned, so the fold across pages
    /// is explicit and testable in isolation.
    fn scan_page(
        &self,
        text: &str,
        page: u32,
        carry: Option<Decimal>,
        out: &mut Vec<Transaction>,
    ) -> Option<Decimal> {
        let mut carry = carry;

        for line in text.lines() {
            let line = line.trim();
            let Some((date, rest)) = leading_date(line) else {
                continue;
            };
            if BALANCE_ROW.is_match(line) {
                continue;
            }

            let tokens = money_tokens(rest);
            let Some(last) = tokens.last() else {
                continue;
            };
            let row_balance = last.value;

            let amount = match carry {
                Some(prev) => (row_balance - prev).round_dp(2),
                // First ledger row without a known opening balance: trust
                // the printed movement column when there is one.
                None if tokens.len() >= 2 => tokens[tokens.len() - 2].value,
                None => continue,
            };

            // Lines that do not move the balance and carry a single token
            // are internal metadata, not movements.
            if amount.is_zero() && tokens.len() < 2 {
                carry = Some(row_balance);
                continue;
            }

            let mut description = rest.to_string();
            for token in &tokens {
                description = description.replace(&token.raw, "");
            }
            let description = description
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .trim_matches(|c| c == ' ' || c == '-')
                .to_string();

            let type_hint = if amount > Decimal::ZERO {
                Some(TypeHint::Credit)
            } else if amount < Decimal::ZERO {
                Some(TypeHint::Debit)
            } else {
                None
            };

            out.push(Transaction {
                date,
                category_hint: category_hint(&description),
                description,
                amount: Some(amount),
                balance: Some(row_balance),
                currency: Some("ARS".to_string()),
                type_hint,
                source_page: Some(page),
                source_raw: Some(line.to_string()),
            });

            carry = Some(row_balance);
        }

        carry
    }
}

/// Ledger portion of a page: everything before the first trailing
/// informational section.
fn ledger_text(page_text: &str) -> &str {
    match SECTION_BOUNDARY.find(page_text) {
        Some(boundary) => &page_text[..boundary.start()],
        None => page_text,
    }
}

impl StructuralParser for CorrientesStatementParser {
    fn name(&self) -> &'static str {
        "CORRIENTES_STATEMENT"
    }

    fn detect(&self, profile: &DocumentProfile) -> f32 {
        if profile.is_scanned {
            return 0.0;
        }

        let text = profile.sample_text.to_lowercase();
        if NAME_FRAGMENTS.iter().any(|fragment| text.contains(fragment)) {
            1.0
        } else {
            0.0
        }
    }

    fn extract(&self, pdf_bytes: &[u8], _profile: &DocumentProfile) -> Result<RawDocument> {
        let document = PdfDocument::load(pdf_bytes)?;
        Ok(RawDocument::from_pages(document.page_texts()))
    }

    fn normalize(&self, raw: &RawDocument, profile: &DocumentProfile) -> Vec<Transaction> {
        let meta = self.extract_meta(raw, profile);

        let mut transactions = Vec::new();
        let mut carry = meta.opening_balance;

        for page in &raw.pages {
            carry = self.scan_page(ledger_text(&page.text), page.number, carry, &mut transactions);
        }

        debug!(
            "normalized {} transactions, final balance {:?}",
            transactions.len(),
            carry
        );
        transactions
    }

    fn extract_meta(&self, raw: &RawDocument, _profile: &DocumentProfile) -> StatementMeta {
        let text = raw.full_text();

        let mut meta = StatementMeta {
            institution_name: Some("Banco de Corrientes".to_string()),
            account_type: Some("Caja de Ahorro".to_string()),
            currency: Some("ARS".to_string()),
            ..Default::default()
        };

        if let Some(caps) = PERIOD_RANGE.captures(&text) {
            meta.period_start = parse_date_token(&caps[1]);
            meta.period_end = parse_date_token(&caps[2]);
        }
        if let Some(caps) = OPENING_BALANCE.captures(&text) {
            meta.opening_balance = parse_money(&caps[1]);
        }
        if let Some(caps) = CLOSING_BALANCE.captures(&text) {
            meta.closing_balance = parse_money(&caps[1]);
        }

        meta
    }

    fn validate(&self, transactions: &[Transaction], meta: &StatementMeta) -> Vec<WarningItem> {
        let mut warnings = Vec::new();

        if transactions.is_empty() {
            warnings.push(WarningItem::new(
                WarningCode::NoTransactions,
                Severity::Critical,
                "no movements detected",
            ));
            return warnings;
        }

        if let (Some(last_balance), Some(closing)) = (
            transactions.last().and_then(|t| t.balance),
            meta.closing_balance,
        ) {
            let diff = (last_balance - closing).abs();
            if diff > self.amount_tolerance {
                warnings.push(
                    WarningItem::new(
                        WarningCode::BalanceMismatch,
                        Severity::High,
                        format!(
                            "ledger ends at {} but the statement declares {}",
                            last_balance, closing
                        ),
                    )
                    .with_evidence(serde_json::json!({
                        "expected": last_balance,
                        "actual": closing,
                    })),
                );
            }
        }

        warnings
    }
}
