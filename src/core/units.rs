//! UN/CEFACT Recommendation 20 unit codes.
//!
//! Subset of the ~2000-entry Rec 20 list covering the codes that show up in
//! European e-invoicing, plus the defaulting rule for lines without an
//! explicit unit: goods bill as pieces, services as service units.

use super::types::ItemKind;

/// Check whether `code` is a known UN/CEFACT Rec 20 unit code.
pub fn is_known_unit_code(code: &str) -> bool {
    COMMON_UNIT_CODES.binary_search(&code).is_ok()
}

/// Default unit code for a line that carries none.
pub fn default_unit_code(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Goods => "C62",    // one (piece)
        ItemKind::Services => "E48", // service unit
    }
}

/// Sorted list of common UN/CEFACT Rec 20 unit codes.
static COMMON_UNIT_CODES: &[&str] = &[
    "ANN", // Year
    "BX",  // Box
    "C62", // One (piece/unit)
    "CMT", // Centimetre
    "CS",  // Case
    "CT",  // Carton
    "DAY", // Day
    "DZN", // Dozen
    "E48", // Service unit
    "EA",  // Each
    "GRM", // Gram
    "HUR", // Hour
    "KGM", // Kilogram
    "KMT", // Kilometre
    "KWH", // Kilowatt-hour
    "LTR", // Litre
    "MIN", // Minute
    "MON", // Month
    "MTK", // Square metre
    "MTQ", // Cubic metre
    "MTR", // Metre
    "NAR", // Number of articles
    "PCE", // Piece
    "SET", // Set
    "TNE", // Tonne
    "WEE", // Week
    "XPP", // Unpacked unit
];
