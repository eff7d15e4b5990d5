//! Balance consistency validation.
//!
//! Parser- and institution-agnostic: whatever produced the transactions,
//! the running balances must close arithmetically. This is also where the
//! sign of ambiguously-parsed amounts is corrected, since the balance
//! column is more reliable than the sign conventions of the movement
//! column.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::statement::{Severity, Transaction, WarningCode, WarningItem};

/// Index of the opening-balance pseudo-row, if the sequence starts with
/// one. Such a row anchors the comparisons but is not itself a movement.
pub fn opening_balance_row(transactions: &[Transaction]) -> Option<usize> {
    let first = transactions.first()?;
    let description = first.description.to_lowercase();
    if description.contains("saldo") || description.contains("balance") {
        Some(0)
    } else {
        None
    }
}

/// Signed amount implied by two consecutive balances.
///
/// The delta replaces the raw amount only when the magnitudes agree within
/// `tolerance` — a sign correction, never a silent magnitude change. A
/// missing raw amount is filled from the delta directly.
pub fn infer_signed_amount(
    prev_balance: Decimal,
    curr_balance: Decimal,
    raw_amount: Option<Decimal>,
    tolerance: Decimal,
) -> Decimal {
    let delta = (curr_balance - prev_balance).round_dp(2);

    match raw_amount {
        None => delta,
        Some(raw) => {
            if (delta.abs() - raw.abs()).abs() < tolerance {
                delta
            } else {
                raw
            }
        }
    }
}

/// Check that the balance closes movement by movement.
///
/// Sorts the sequence chronologically (stable, so same-day source order is
/// preserved), corrects amount signs from balance deltas, and returns the
/// findings plus a consistency score in [0, 100].
pub fn check_balance_consistency(
    transactions: &mut [Transaction],
    tolerance: Decimal,
) -> (Vec<WarningItem>, u8) {
    let mut warnings = Vec::new();

    if transactions.len() < 2 {
        return (warnings, 100);
    }

    transactions.sort_by(|a, b| a.date.cmp(&b.date));

    let mut ok: u32 = 0;
    let mut fail: u32 = 0;

    let start = match opening_balance_row(transactions) {
        Some(anchor) => anchor + 1,
        None => 1,
    };

    for i in start..transactions.len() {
        let (prev_balance, curr_balance) =
            match (transactions[i - 1].balance, transactions[i].balance) {
                (Some(prev), Some(curr)) => (prev, curr),
                _ => continue,
            };

        let corrected =
            infer_signed_amount(prev_balance, curr_balance, transactions[i].amount, tolerance);
        transactions[i].amount = Some(corrected);

        let expected = prev_balance + corrected;
        if (expected - curr_balance).abs() < tolerance {
            ok += 1;
        } else {
            fail += 1;

            let mut warning = WarningItem::new(
                WarningCode::BalanceMismatch,
                Severity::High,
                format!(
                    "inconsistent balance at {}: expected {}, got {}",
                    transactions[i].date, expected, curr_balance
                ),
            )
            .with_evidence(serde_json::json!({
                "prev_balance": prev_balance,
                "amount": corrected,
                "expected": expected,
                "actual": curr_balance,
            }));
            if let Some(page) = transactions[i].source_page {
                warning = warning.with_pages(vec![page]);
            }
            warnings.push(warning);
        }
    }

    let total = ok + fail;
    let score = if total > 0 { (ok * 100 / total) as u8 } else { 100 };

    debug!("balance check: {} ok, {} fail, score {}", ok, fail, score);
    (warnings, score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tolerance() -> Decimal {
        Decimal::new(2, 2)
    }

    fn tx(day: u32, description: &str, amount: Option<&str>, balance: Option<&str>) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            description: description.to_string(),
            amount: amount.map(dec),
            balance: balance.map(dec),
            currency: None,
            type_hint: None,
            category_hint: None,
            source_page: Some(1),
            source_raw: None,
        }
    }

    #[test]
    fn consistent_sequence_scores_full() {
        let mut transactions = vec![
            tx(1, "SALDO ANTERIOR", None, Some("1000.00")),
            tx(5, "PAYMENT RECEIVED", Some("250.00"), Some("1250.00")),
        ];

        let (warnings, score) = check_balance_consistency(&mut transactions, tolerance());

        assert!(warnings.is_empty());
        assert_eq!(score, 100);
        assert_eq!(transactions[1].amount, Some(dec("250.00")));
    }

    #[test]
    fn mismatch_emits_evidence() {
        // The last row's printed balance jumps to 1300 while its movement
        // column says 25: arithmetic cannot close.
        let mut transactions = vec![
            tx(1, "SALDO ANTERIOR", None, Some("1000.00")),
            tx(5, "PAYMENT RECEIVED", Some("250.00"), Some("1250.00")),
            tx(6, "AJUSTE", Some("25.00"), Some("1300.00")),
        ];

        let (warnings, score) = check_balance_consistency(&mut transactions, tolerance());

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::BalanceMismatch);
        assert_eq!(warnings[0].pages, Some(vec![1]));

        let evidence = warnings[0].evidence.as_ref().unwrap();
        assert_eq!(
            Decimal::from_str(evidence["expected"].as_str().unwrap()).unwrap(),
            dec("1275.00")
        );
        assert_eq!(
            Decimal::from_str(evidence["actual"].as_str().unwrap()).unwrap(),
            dec("1300.00")
        );
        assert_eq!(score, 50);
    }

    #[test]
    fn sign_is_corrected_from_balance_delta() {
        // The statement prints the debit unsigned; the falling balance
        // reveals the true sign.
        let mut transactions = vec![
            tx(1, "TRANSFERENCIA", Some("100.00"), Some("1000.00")),
            tx(2, "COMISION", Some("50.00"), Some("950.00")),
        ];

        let (warnings, score) = check_balance_consistency(&mut transactions, tolerance());

        assert!(warnings.is_empty());
        assert_eq!(score, 100);
        assert_eq!(transactions[1].amount, Some(dec("-50.00")));
    }

    #[test]
    fn magnitude_disagreement_is_not_rewritten() {
        // Delta is -300 but the raw amount says 50: the magnitudes differ,
        // so the raw amount survives and the pair is flagged.
        let mut transactions = vec![
            tx(1, "A", Some("100.00"), Some("1000.00")),
            tx(2, "B", Some("50.00"), Some("700.00")),
        ];

        let (warnings, _score) = check_balance_consistency(&mut transactions, tolerance());

        assert_eq!(transactions[1].amount, Some(dec("50.00")));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn missing_amount_is_filled_from_delta() {
        let mut transactions = vec![
            tx(1, "A", Some("100.00"), Some("1000.00")),
            tx(2, "ACREDITACION", None, Some("1400.00")),
        ];

        let (warnings, score) = check_balance_consistency(&mut transactions, tolerance());

        assert!(warnings.is_empty());
        assert_eq!(score, 100);
        assert_eq!(transactions[1].amount, Some(dec("400.00")));
    }

    #[test]
    fn sorts_chronologically_but_keeps_same_day_order() {
        let mut transactions = vec![
            tx(10, "second", Some("-10.00"), Some("990.00")),
            tx(5, "first", None, Some("1000.00")),
            tx(10, "third", Some("-90.00"), Some("900.00")),
        ];

        let (warnings, score) = check_balance_consistency(&mut transactions, tolerance());

        assert_eq!(transactions[0].description, "first");
        assert_eq!(transactions[1].description, "second");
        assert_eq!(transactions[2].description, "third");
        assert!(warnings.is_empty());
        assert_eq!(score, 100);
    }

    #[test]
    fn unknown_balances_are_skipped() {
        let mut transactions = vec![
            tx(1, "A", Some("100.00"), Some("1000.00")),
            tx(2, "B", Some("50.00"), None),
            tx(3, "C", Some("25.00"), Some("1075.00")),
        ];

        let (warnings, score) = check_balance_consistency(&mut transactions, tolerance());

        // No adjacent pair has two known balances, so there is nothing to
        // check and nothing to flag.
        assert!(warnings.is_empty());
        assert_eq!(score, 100);
    }

    #[test]
    fn short_sequences_score_full() {
        let mut transactions = vec![tx(1, "only", Some("10.00"), Some("10.00"))];
        let (warnings, score) = check_balance_consistency(&mut transactions, tolerance());
        assert!(warnings.is_empty());
        assert_eq!(score, 100);
    }
}
