//! Common regex patterns for statement token extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date tokens (dd/mm/yy, dd/mm/yyyy, also . and - separators)
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{2,4})\b"
    ).unwrap();

    pub static ref LEADING_DATE: Regex = Regex::new(
        r"^(\d{1,2})[./-](\d{1,2})[./-](\d{2,4})\b"
    ).unwrap();

    // Money tokens. Grouped ("1.250,00") or plain ("1250,00") integer part,
    // always a two-digit decimal tail, optional sign and currency symbol.
    pub static ref MONEY_TOKEN: Regex = Regex::new(
        r"-?\s?\$?\s?\d+(?:[.,]\d{3})*[.,]\d{2}\b"
    ).unwrap();

    // Statement period ("Periodo: 01/01/24 al 31/01/24")
    pub static ref PERIOD_RANGE: Regex = Regex::new(
        r"(?i)per[íi]odo\s*:?\s*(\d{1,2}/\d{1,2}/\d{2,4})\s*al\s*(\d{1,2}/\d{1,2}/\d{2,4})"
    ).unwrap();

    // Labeled balances
    pub static ref OPENING_BALANCE: Regex = Regex::new(
        r"(?i)saldo\s+(?:inicial|anterior)\s*:?\s*\$?\s*(-?[\d.,]+)"
    ).unwrap();

    pub static ref CLOSING_BALANCE: Regex = Regex::new(
        r"(?i)saldo\s+(?:final|al\s+cierre)\s*:?\s*\$?\s*(-?[\d.,]+)"
    ).unwrap();

    // Lines that restate a balance rather than describe a movement
    pub static ref BALANCE_ROW: Regex = Regex::new(
        r"(?i)saldo\s+(?:inicial|anterior|final)"
    ).unwrap();

    // Trailing informational sections appended after the main ledger table.
    // Scanning past these markers double-counts movements.
    pub static ref SECTION_BOUNDARY: Regex = Regex::new(
        r"(?i)transferencias\s+mep|debitos\s+automaticos"
    ).unwrap();
}
