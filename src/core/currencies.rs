//! ISO 4217 currency lookup.
//!
//! Covers the currencies relevant to European e-invoicing plus the major
//! world currencies. Sorted tables, binary search.

/// Check whether `code` is a known ISO 4217 currency code.
pub fn is_known_currency_code(code: &str) -> bool {
    CURRENCIES.binary_search_by(|(c, _, _)| c.cmp(&code)).is_ok()
}

/// Display symbol for a currency code. Falls back to the code itself.
pub fn currency_symbol(code: &str) -> &str {
    match CURRENCIES.binary_search_by(|(c, _, _)| c.cmp(&code)) {
        Ok(i) => CURRENCIES[i].1,
        Err(_) => code,
    }
}

/// Minor-unit digits for a currency (2 for all currently modeled currencies
/// except the zero-decimal ones).
pub fn minor_units(code: &str) -> u32 {
    match CURRENCIES.binary_search_by(|(c, _, _)| c.cmp(&code)) {
        Ok(i) => CURRENCIES[i].2,
        Err(_) => 2,
    }
}

/// (code, symbol, minor units). Sorted by code for binary search.
static CURRENCIES: &[(&str, &str, u32)] = &[
    ("AUD", "A$", 2),
    ("BGN", "лв", 2),
    ("CAD", "C$", 2),
    ("CHF", "CHF", 2),
    ("CNY", "¥", 2),
    ("CZK", "Kč", 2),
    ("DKK", "kr", 2),
    ("EUR", "€", 2),
    ("GBP", "£", 2),
    ("HUF", "Ft", 2),
    ("ISK", "kr", 0),
    ("JPY", "¥", 0),
    ("NOK", "kr", 2),
    ("NZD", "NZ$", 2),
    ("PLN", "zł", 2),
    ("RON", "lei", 2),
    ("SEK", "kr", 2),
    ("USD", "$", 2),
];
