use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Heuristic classification of a statement row. At most one aggregate role
/// applies to a row; ordinary line items are the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum RowKind {
    #[default]
    LineItem,
    Section,
    Subtotal,
    Total,
}

impl RowKind {
    pub fn is_section(self) -> bool {
        matches!(self, RowKind::Section)
    }

    pub fn is_subtotal(self) -> bool {
        matches!(self, RowKind::Subtotal)
    }

    pub fn is_total(self) -> bool {
        matches!(self, RowKind::Total)
    }

    pub fn is_line_item(self) -> bool {
        matches!(self, RowKind::LineItem)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlign {
    Left,
    Center,
    Right,
}

/// One resolved spreadsheet cell. Recomputed on every parse; carries no
/// identity beyond its position in the row.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateCell {
    pub value: String,
    /// Numeric interpretation of `value`, when it parses as a number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub align: CellAlign,
    /// Rows spanned by this cell's merge region (1 = unmerged).
    pub row_span: u32,
    pub col_span: u32,
    pub indent: u8,
    pub kind: RowKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateRow {
    pub cells: Vec<TemplateCell>,
    pub kind: RowKind,
    /// True when every cell in the row is blank.
    pub is_spacing_row: bool,
    pub is_collapsible: bool,
    /// Set on section-header rows only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<u32>,
    /// The enclosing section for every row after a section header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_section_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateSheet {
    pub name: String,
    pub column_widths_px: Vec<u32>,
    pub rows: Vec<TemplateRow>,
}

impl TemplateSheet {
    pub fn section_ids(&self) -> Vec<u32> {
        self.rows.iter().filter_map(|r| r.section_id).collect()
    }
}

/// A fully parsed workbook, sheet order preserved from the source file.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedTemplate {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub sheets: IndexMap<String, TemplateSheet>,
}

impl ParsedTemplate {
    /// Resolve a sheet by name: exact, then case-insensitive, then substring
    /// in either direction.
    pub fn find_sheet(&self, name: &str) -> Option<&TemplateSheet> {
        if let Some(sheet) = self.sheets.get(name) {
            return Some(sheet);
        }
        let wanted = name.to_lowercase();
        if let Some(sheet) = self
            .sheets
            .values()
            .find(|s| s.name.to_lowercase() == wanted)
        {
            return Some(sheet);
        }
        self.sheets.values().find(|s| {
            let have = s.name.to_lowercase();
            have.contains(&wanted) || wanted.contains(&have)
        })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }
}

/// One flat statement row from the extraction path: a label plus one nullable
/// value per period column.
#[derive(Debug, Clone, Serialize)]
pub struct StatementRow {
    pub label: String,
    pub indent: u8,
    pub kind: RowKind,
    pub is_collapsible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_section_id: Option<u32>,
    /// Period label -> value, in column order.
    pub values: IndexMap<String, Option<f64>>,
}

impl StatementRow {
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied().flatten()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub source: String,
    pub sheet: String,
    pub fetched_at: DateTime<Utc>,
    pub columns: Vec<String>,
    pub rows: Vec<StatementRow>,
}

impl Statement {
    pub fn section_ids(&self) -> Vec<u32> {
        self.rows.iter().filter_map(|r| r.section_id).collect()
    }
}
