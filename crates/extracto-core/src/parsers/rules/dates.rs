//! Date token parsing for statement lines.

use chrono::NaiveDate;

use super::patterns::{DATE_TOKEN, LEADING_DATE};

/// Parse a single date token (`05/01/24`, `05/01/2024`, `5-1-2024`).
///
/// Returns `None` for tokens that do not form a real calendar date.
pub fn parse_date_token(raw: &str) -> Option<NaiveDate> {
    let caps = DATE_TOKEN.captures(raw)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = parse_year(&caps[3]);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Date token at the very start of a line, plus the rest of the line.
pub fn leading_date(line: &str) -> Option<(NaiveDate, &str)> {
    let m = LEADING_DATE.find(line)?;
    let date = parse_date_token(m.as_str())?;
    Some((date, line[m.end()..].trim_start()))
}

/// Number of date-like tokens in a text block. Used by the generic parser
/// as a cheap density signal for applicability scoring.
pub fn date_token_count(text: &str) -> usize {
    DATE_TOKEN
        .find_iter(text)
        .filter(|m| parse_date_token(m.as_str()).is_some())
        .count()
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: 00-50 -> 2000s, 51-99 -> 1900s
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_year() {
        assert_eq!(
            parse_date_token("05/01/24"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn parses_full_year_and_other_separators() {
        assert_eq!(
            parse_date_token("05/01/2024"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_date_token("5-1-2024"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_date_token("15.03.99"),
            NaiveDate::from_ymd_opt(1999, 3, 15)
        );
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(parse_date_token("32/01/24"), None);
        assert_eq!(parse_date_token("05/13/24"), None);
    }

    #[test]
    fn leading_date_splits_rest() {
        let (date, rest) = leading_date("05/01/24 PAYMENT RECEIVED 250,00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(rest, "PAYMENT RECEIVED 250,00");

        assert!(leading_date("PAYMENT 05/01/24").is_none());
    }

    #[test]
    fn counts_only_real_dates() {
        let text = "05/01/24 movimiento\n06/01/24 otro\n99/99/99 ruido";
        assert_eq!(date_token_count(text), 2);
    }
}
