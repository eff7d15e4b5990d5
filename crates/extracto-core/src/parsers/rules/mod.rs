//! Token grammar shared by the structural parsers.
//!
//! Date and money tokens are named, individually testable functions rather
//! than inline patterns scattered across parsers.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{money_tokens, parse_money, MoneyToken};
pub use dates::{date_token_count, leading_date, parse_date_token};

use crate::models::statement::CategoryHint;

const CATEGORY_KEYWORDS: &[(&str, CategoryHint)] = &[
    ("impuesto", CategoryHint::Tax),
    ("percepcion", CategoryHint::Tax),
    ("iva ", CategoryHint::Tax),
    ("ley 25413", CategoryHint::Tax),
    ("comision", CategoryHint::Fee),
    ("mantenimiento", CategoryHint::Fee),
    ("transferencia", CategoryHint::Transfer),
    ("transf.", CategoryHint::Transfer),
    ("tarjeta", CategoryHint::Card),
    ("debito autom", CategoryHint::Card),
    ("compra", CategoryHint::Card),
];

/// Coarse movement category from description keywords. First hit wins.
pub fn category_hint(description: &str) -> Option<CategoryHint> {
    let lowered = description.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(fragment, _)| lowered.contains(fragment))
        .map(|(_, hint)| *hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_common_movements() {
        assert_eq!(category_hint("IMPUESTO LEY 25413"), Some(CategoryHint::Tax));
        assert_eq!(
            category_hint("COMISION MANTENIMIENTO CUENTA"),
            Some(CategoryHint::Fee)
        );
        assert_eq!(
            category_hint("TRANSFERENCIA RECIBIDA"),
            Some(CategoryHint::Transfer)
        );
        assert_eq!(category_hint("COMPRA TARJETA DEBITO"), Some(CategoryHint::Card));
        assert_eq!(category_hint("ACREDITACION HABERES"), None);
    }
}
