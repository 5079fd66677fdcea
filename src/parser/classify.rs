use crate::model::RowKind;
use once_cell::sync::Lazy;
use regex::Regex;

static TOTAL_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*TOTAL\b").unwrap());

/// Labels that mark a grand total rather than a running subtotal. Matched
/// against the uppercased label; the "FOR" entries are phrase prefixes that
/// appear mid-label ("Total comprehensive income for the year").
const GRAND_TOTAL_PHRASES: &[&str] = &[
    "TOTAL ASSETS",
    "TOTAL LIABILITIES",
    "TOTAL EQUITY",
    "COMPREHENSIVE INCOME FOR",
    "PROFIT FOR THE YEAR",
    "PROFIT FOR THE PERIOD",
    "LOSS FOR THE YEAR",
    "LOSS FOR THE PERIOD",
];

/// Canonical section headings of Big-4-style statements. A bold label that is
/// not all-uppercase still opens a section when it appears here.
const SECTION_KEYWORDS: &[&str] = &[
    "ASSETS",
    "LIABILITIES",
    "EQUITY",
    "REVENUE",
    "EXPENSES",
    "INCOME",
    "CURRENT ASSETS",
    "NON-CURRENT ASSETS",
    "CURRENT LIABILITIES",
    "NON-CURRENT LIABILITIES",
    "EQUITY AND LIABILITIES",
    "OPERATING ACTIVITIES",
    "INVESTING ACTIVITIES",
    "FINANCING ACTIVITIES",
];

pub fn is_grand_total_label(label: &str) -> bool {
    let upper = label.trim().to_uppercase();
    GRAND_TOTAL_PHRASES.iter().any(|p| upper.contains(p))
}

pub fn is_total_prefixed(label: &str) -> bool {
    TOTAL_PREFIX_RE.is_match(label)
}

pub fn is_section_keyword(label: &str) -> bool {
    let upper = label.trim().to_uppercase();
    SECTION_KEYWORDS.contains(&upper.as_str())
}

/// All alphabetic characters uppercase, with at least one of them present.
pub fn is_all_uppercase(label: &str) -> bool {
    let trimmed = label.trim();
    trimmed.chars().any(|c| c.is_alphabetic()) && !trimmed.chars().any(|c| c.is_lowercase())
}

/// Style-aware classification used by the template parser. `row_has_numbers`
/// is row-level context: section headers never share a row with figures.
pub fn classify_cell(text: &str, bold: bool, row_has_numbers: bool) -> RowKind {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return RowKind::LineItem;
    }
    if is_grand_total_label(trimmed) {
        return RowKind::Total;
    }
    if is_total_prefixed(trimmed) {
        return RowKind::Subtotal;
    }
    if bold && !row_has_numbers && (is_all_uppercase(trimmed) || is_section_keyword(trimmed)) {
        return RowKind::Section;
    }
    RowKind::LineItem
}
