//! Flat statement extraction: converts one worksheet into `{columns, rows}`
//! for direct table rendering. This path is deliberately independent of the
//! template parser — it works from raw cell text only and re-derives the
//! section/subtotal/total rules without consulting styles.

use crate::errors::StatementError;
use crate::model::{RowKind, Statement, StatementRow};
use crate::parser::find_sheet;
use chrono::Utc;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// Rows scanned from the top of the sheet when looking for a period header.
const HEADER_SCAN_ROWS: usize = 10;

/// Labels used when no date-like header row is found and columns have to be
/// inferred from numeric cell counts.
const DEFAULT_PERIOD_LABELS: [&str; 2] = ["Current period", "Prior period"];

static MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\b").unwrap()
});
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());
static DAY_MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[-/.][A-Za-z0-9]{1,3}[-/.]\d{2,4}\b").unwrap());

static TOTAL_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^total\b").unwrap());

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

/// Extract the named sheet as a flat statement. Sheet lookup falls back from
/// exact to case-insensitive to substring; a miss lists the available names.
pub fn extract_statement(
    book: &Spreadsheet,
    sheet_name: &str,
    source: &str,
) -> Result<Statement, StatementError> {
    let worksheet = find_sheet(book, sheet_name).ok_or_else(|| StatementError::SheetNotFound {
        requested: sheet_name.to_string(),
        available: crate::parser::sheet_names(book),
    })?;

    let grid = sheet_grid(worksheet);
    let header = infer_columns(&grid);
    let data_start = header.header_row.map(|r| r + 1).unwrap_or(0);

    let mut rows = Vec::new();
    let mut next_section_id = 0u32;
    let mut current_section: Option<u32> = None;

    for raw_row in grid.iter().skip(data_start) {
        let Some(label_cell) = raw_row.iter().find(|c| !c.trim().is_empty()) else {
            continue;
        };
        let label = label_cell.trim();

        let mut values: IndexMap<String, Option<f64>> = IndexMap::new();
        for (key, col) in header.columns.iter().zip(&header.column_indexes) {
            let value = raw_row.get(*col).and_then(|text| parse_number(text));
            values.insert(key.clone(), value);
        }
        let has_numbers = values.values().any(|v| v.is_some());

        let kind = classify_row(label, has_numbers);
        let (section_id, parent_section_id, is_collapsible) = if kind.is_section() {
            next_section_id += 1;
            current_section = Some(next_section_id);
            (Some(next_section_id), None, true)
        } else {
            (None, current_section, false)
        };

        rows.push(StatementRow {
            label: label.to_string(),
            indent: leading_spaces(label_cell) / 2,
            kind,
            is_collapsible,
            section_id,
            parent_section_id,
            values,
        });
    }

    Ok(Statement {
        source: source.to_string(),
        sheet: worksheet.get_name().to_string(),
        fetched_at: Utc::now(),
        columns: header.columns,
        rows,
    })
}

fn sheet_grid(worksheet: &Worksheet) -> Vec<Vec<String>> {
    let (max_col, max_row) = worksheet.get_highest_column_and_row();
    (1..=max_row)
        .map(|row| {
            (1..=max_col)
                .map(|col| {
                    worksheet
                        .get_cell((col, row))
                        .map(|cell| cell.get_value().to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

struct ColumnHeader {
    columns: Vec<String>,
    column_indexes: Vec<usize>,
    header_row: Option<usize>,
}

/// Find period columns. First ten rows are scanned for date-like header
/// cells; failing that, the first row carrying figures determines the column
/// count and columns get fixed default period labels.
fn infer_columns(grid: &[Vec<String>]) -> ColumnHeader {
    for (row_idx, row) in grid.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let mut columns = Vec::new();
        let mut column_indexes = Vec::new();
        for (col_idx, cell) in row.iter().enumerate() {
            let trimmed = cell.trim();
            if !trimmed.is_empty() && looks_like_period(trimmed) {
                columns.push(trimmed.to_string());
                column_indexes.push(col_idx);
            }
        }
        if !columns.is_empty() {
            return ColumnHeader {
                columns,
                column_indexes,
                header_row: Some(row_idx),
            };
        }
    }

    for row in grid {
        let numeric: Vec<usize> = row
            .iter()
            .enumerate()
            .filter(|(_, cell)| parse_number(cell).is_some())
            .map(|(idx, _)| idx)
            .collect();
        if !numeric.is_empty() {
            let columns = numeric
                .iter()
                .enumerate()
                .map(|(i, _)| match DEFAULT_PERIOD_LABELS.get(i) {
                    Some(label) => (*label).to_string(),
                    None => format!("Period {}", i + 1),
                })
                .collect();
            return ColumnHeader {
                columns,
                column_indexes: numeric,
                header_row: None,
            };
        }
    }

    ColumnHeader {
        columns: Vec::new(),
        column_indexes: Vec::new(),
        header_row: None,
    }
}

fn looks_like_period(text: &str) -> bool {
    MONTH_RE.is_match(text) || YEAR_RE.is_match(text) || DAY_MONTH_YEAR_RE.is_match(text)
}

/// Comma-stripping string-to-float; accountant parentheses negate. Anything
/// else is a null value.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (body, negative) = match trimmed.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => (inner, true),
        None => (trimmed, false),
    };
    let cleaned: String = body.chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.trim().parse().ok()?;
    Some(if negative { -value } else { value })
}

fn leading_spaces(text: &str) -> u8 {
    let leading = text.len() - text.trim_start().len();
    leading.min(u8::MAX as usize) as u8
}

/// Text-only re-derivation of the classification rules: this path has no
/// style information, so the bold requirement for section headers is dropped.
fn classify_row(label: &str, has_numbers: bool) -> RowKind {
    let upper = label.to_uppercase();
    if GRAND_TOTAL_PHRASES.iter().any(|p| upper.contains(p)) {
        return RowKind::Total;
    }
    if TOTAL_PREFIX_RE.is_match(label) {
        return RowKind::Subtotal;
    }
    if !has_numbers && (is_all_uppercase(label) || SECTION_KEYWORDS.contains(&upper.as_str())) {
        return RowKind::Section;
    }
    RowKind::LineItem
}

fn is_all_uppercase(label: &str) -> bool {
    label.chars().any(|c| c.is_alphabetic()) && !label.chars().any(|c| c.is_lowercase())
}
