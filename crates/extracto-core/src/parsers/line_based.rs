//! Generic line-oriented statement parser.
//!
//! Applicable to any institution whose statements print one movement per
//! line starting with a date. Knows nothing about column layouts; it only
//! understands date tokens, money tokens, and continuation lines.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::rules::{
    category_hint, date_token_count, leading_date, money_tokens, parse_date_token, parse_money,
    patterns::{CLOSING_BALANCE, OPENING_BALANCE, PERIOD_RANGE},
};
use super::{RawDocument, Result, StructuralParser};
use crate::models::config::ExtractoConfig;
use crate::models::statement::{
    DocumentProfile, Severity, StatementMeta, Transaction, TypeHint, WarningCode, WarningItem,
};
use crate::pdf::PdfDocument;

/// Line-based structural parser.
pub struct LineBasedParser {
    date_density_target: u32,
    amount_tolerance: Decimal,
}

impl LineBasedParser {
    pub fn new(config: &ExtractoConfig) -> Self {
        Self {
            date_density_target: config.parser.date_density_target.max(1),
            amount_tolerance: config.validation.amount_tolerance,
        }
    }

    fn transaction_from_line(
        &self,
        line: &str,
        rest: &str,
        date: NaiveDate,
        page: u32,
    ) -> Option<Transaction> {
        let tokens = money_tokens(rest);
        if tokens.is_empty() {
            return None;
        }

        // Two tokens: movement + running balance. One: balance only, the
        // amount is inferred later from the balance delta. More than two:
        // the extra tokens are usually reference numbers that look like
        // amounts; the last two are the best candidates.
        let (amount, balance) = match tokens.len() {
            1 => (None, Some(tokens[0].value)),
            2 => (Some(tokens[0].value), Some(tokens[1].value)),
            n => {
                warn!(
                    "line has {} money-like tokens, taking the last two as amount/balance: {:?}",
                    n, line
                );
                (Some(tokens[n - 2].value), Some(tokens[n - 1].value))
            }
        };

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

        let type_hint = amount.and_then(|a| {
            if a > Decimal::ZERO {
                Some(TypeHint::Credit)
            } else if a < Decimal::ZERO {
                Some(TypeHint::Debit)
            } else {
                None
            }
        });

        Some(Transaction {
            date,
            category_hint: category_hint(&description),
            description,
            amount,
            balance,
            currency: None,
            type_hint,
            source_page: Some(page),
            source_raw: Some(line.to_string()),
        })
    }
}

impl StructuralParser for LineBasedParser {
    fn name(&self) -> &'static str {
        "LINE_BASED"
    }

    fn detect(&self, profile: &DocumentProfile) -> f32 {
        if profile.is_scanned || profile.sample_text.trim().is_empty() {
            return 0.0;
        }

        let hits = date_token_count(&profile.sample_text) as f32;
        (hits / self.date_density_target as f32).min(1.0)
    }

    fn extract(&self, pdf_bytes: &[u8], _profile: &DocumentProfile) -> Result<RawDocument> {
        let document = PdfDocument::load(pdf_bytes)?;
        Ok(RawDocument::from_pages(document.page_texts()))
    }

    fn normalize(&self, raw: &RawDocument, _profile: &DocumentProfile) -> Vec<Transaction> {
        let mut transactions = Vec::new();
        let mut current: Option<Transaction> = None;

        for page in &raw.pages {
            for line in page.text.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let started = leading_date(line).and_then(|(date, rest)| {
                    self.transaction_from_line(line, rest, date, page.number)
                });

                match started {
                    Some(transaction) => {
                        // New movement: flush the buffered one first.
                        if let Some(done) = current.take() {
                            transactions.push(done);
                        }
                        current = Some(transaction);
                    }
                    None => {
                        // No leading date (or no money): the line continues
                        // the previous movement's description.
                        if let Some(open) = current.as_mut() {
                            open.description.push(' ');
                            open.description.push_str(line);
                        }
                    }
                }
            }
        }

        if let Some(done) = current.take() {
            transactions.push(done);
        }

        debug!("normalized {} transactions", transactions.len());
        transactions
    }

    fn extract_meta(&self, raw: &RawDocument, _profile: &DocumentProfile) -> StatementMeta {
        let text = raw.full_text();
        let mut meta = StatementMeta::default();

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

        let missing = transactions.iter().filter(|t| t.balance.is_none()).count();
        if missing > 0 {
            warnings.push(WarningItem::new(
                WarningCode::MissingBalance,
                Severity::Med,
                format!("{} movements without a running balance", missing),
            ));
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
