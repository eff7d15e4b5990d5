//! Money token parsing with locale-aware separator disambiguation.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{DATE_TOKEN, MONEY_TOKEN};

/// A money-like token found on a statement line.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyToken {
    /// Exact matched text, as printed (used to strip it from descriptions).
    pub raw: String,
    /// Parsed signed value.
    pub value: Decimal,
}

/// Parse a raw money string into a signed decimal.
///
/// Separator rule: when both `.` and `,` appear, the rightmost one is the
/// decimal point; a lone comma is a decimal comma; a lone dot is a decimal
/// point only when followed by exactly two digits, otherwise it is
/// thousands grouping.
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ' ' | '\u{00a0}'))
        .collect();

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    if digits.is_empty() {
        return None;
    }

    let comma = digits.rfind(',');
    let dot = digits.rfind('.');

    let normalized = match (comma, dot) {
        (Some(c), Some(d)) if c > d => digits.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => digits.replace(',', ""),
        (Some(_), None) => digits.replace(',', "."),
        (None, Some(d)) => {
            if digits.len() - d == 3 {
                let (head, tail) = digits.split_at(d);
                format!("{}{}", head.replace('.', ""), tail)
            } else {
                digits.replace('.', "")
            }
        }
        (None, None) => digits.to_string(),
    };

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

/// All money tokens on a line, in order of appearance.
///
/// Date tokens are blanked out first so that dotted dates (`05.01.24`)
/// never masquerade as amounts.
pub fn money_tokens(line: &str) -> Vec<MoneyToken> {
    let scannable = blank_dates(line);

    MONEY_TOKEN
        .find_iter(&scannable)
        .filter_map(|m| {
            parse_money(m.as_str()).map(|value| MoneyToken {
                raw: line[m.range()].to_string(),
                value,
            })
        })
        .collect()
}

fn blank_dates(line: &str) -> String {
    let mut out = line.to_string();
    for m in DATE_TOKEN.find_iter(line) {
        out.replace_range(m.range(), &" ".repeat(m.len()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn rightmost_separator_wins() {
        assert_eq!(parse_money("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_money("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_money("12.345.678,90"), Some(dec("12345678.90")));
    }

    #[test]
    fn lone_comma_is_decimal() {
        assert_eq!(parse_money("250,00"), Some(dec("250.00")));
        assert_eq!(parse_money("1250,00"), Some(dec("1250.00")));
    }

    #[test]
    fn lone_dot_depends_on_tail() {
        assert_eq!(parse_money("123.45"), Some(dec("123.45")));
        assert_eq!(parse_money("1.234"), Some(dec("1234")));
    }

    #[test]
    fn sign_and_symbol_stripping() {
        assert_eq!(parse_money("-$ 1.000,00"), Some(dec("-1000.00")));
        assert_eq!(parse_money("$ 250,00"), Some(dec("250.00")));
    }

    #[test]
    fn tokenizes_in_order() {
        let tokens = money_tokens("PAYMENT RECEIVED  250,00  1250,00");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, dec("250.00"));
        assert_eq!(tokens[1].value, dec("1250.00"));
    }

    #[test]
    fn dotted_dates_are_not_amounts() {
        let tokens = money_tokens("05.01.24 COMPRA TARJETA 1.500,00");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, dec("1500.00"));
    }

    #[test]
    fn grouped_and_plain_amounts_on_one_line() {
        let tokens = money_tokens("05/01/24 TRANSFERENCIA 1.250,00 2500,00");
        let values: Vec<Decimal> = tokens.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![dec("1250.00"), dec("2500.00")]);
    }
}
