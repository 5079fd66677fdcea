use crate::model::{CellAlign, ParsedTemplate, TemplateCell, TemplateRow, TemplateSheet};
use chrono::Utc;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use umya_spreadsheet::helper::coordinate::index_from_coordinate;
use umya_spreadsheet::structs::HorizontalAlignmentValues;
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// Approximate conversion from Excel character-width units to pixels.
const CHAR_WIDTH_PX: f64 = 7.0;
const CELL_PADDING_PX: f64 = 5.0;
const MIN_COLUMN_PX: u32 = 48;
const MAX_COLUMN_PX: u32 = 320;

/// Parse every sheet of a workbook into the layout-faithful template model.
/// Layout is mirrored exactly: empty rows are kept, merge regions collapse to
/// their top-left cell, and sheet order follows the workbook.
pub fn parse_workbook(book: &Spreadsheet, source: &str) -> ParsedTemplate {
    let mut sheets = IndexMap::new();
    for worksheet in book.get_sheet_collection() {
        let sheet = parse_sheet(worksheet);
        sheets.insert(sheet.name.clone(), sheet);
    }
    ParsedTemplate {
        source: source.to_string(),
        fetched_at: Utc::now(),
        sheets,
    }
}

struct RawCell {
    text: String,
    numeric: Option<f64>,
}

struct MergeMap {
    /// Top-left coordinate of each merge region -> (row_span, col_span).
    spans: HashMap<(u32, u32), (u32, u32)>,
    /// Every non-top-left coordinate covered by a merge region.
    covered: HashSet<(u32, u32)>,
}

pub(crate) fn parse_sheet(worksheet: &Worksheet) -> TemplateSheet {
    let (max_col, max_row) = worksheet.get_highest_column_and_row();
    let merges = merge_map(worksheet);
    let column_widths_px = column_widths(worksheet, max_col, max_row);

    let mut rows = Vec::with_capacity(max_row as usize);
    let mut next_section_id = 0u32;
    let mut current_section: Option<u32> = None;

    for row in 1..=max_row {
        // Row-level context first: classification needs to know whether any
        // cell in the row carries a figure.
        let raw: Vec<RawCell> = (1..=max_col).map(|col| raw_cell(worksheet, col, row)).collect();
        let row_has_numbers = raw.iter().any(|c| c.numeric.is_some());
        let is_spacing_row = raw.iter().all(|c| c.text.trim().is_empty());

        let mut cells = Vec::new();
        for col in 1..=max_col {
            if merges.covered.contains(&(col, row)) {
                continue;
            }
            let rc = &raw[(col - 1) as usize];
            let (row_span, col_span) = merges.spans.get(&(col, row)).copied().unwrap_or((1, 1));
            let (bold, italic, explicit_align) = cell_style_flags(worksheet, col, row);
            let align = explicit_align.unwrap_or(if rc.numeric.is_some() {
                CellAlign::Right
            } else {
                CellAlign::Left
            });
            let kind = super::classify::classify_cell(&rc.text, bold, row_has_numbers);

            cells.push(TemplateCell {
                value: rc.text.trim().to_string(),
                numeric: rc.numeric,
                bold,
                italic,
                align,
                row_span,
                col_span,
                indent: leading_indent(&rc.text),
                kind,
            });
        }

        let kind = cells
            .iter()
            .find(|c| !c.value.is_empty())
            .map(|c| c.kind)
            .unwrap_or_default();

        let (section_id, parent_section_id, is_collapsible) = if kind.is_section() {
            next_section_id += 1;
            current_section = Some(next_section_id);
            (Some(next_section_id), None, true)
        } else {
            (None, current_section, false)
        };

        rows.push(TemplateRow {
            cells,
            kind,
            is_spacing_row,
            is_collapsible,
            section_id,
            parent_section_id,
        });
    }

    TemplateSheet {
        name: worksheet.get_name().to_string(),
        column_widths_px,
        rows,
    }
}

fn raw_cell(worksheet: &Worksheet, col: u32, row: u32) -> RawCell {
    match worksheet.get_cell((col, row)) {
        Some(cell) => {
            let text = cell.get_value().to_string();
            let numeric = text.trim().parse::<f64>().ok();
            RawCell { text, numeric }
        }
        None => RawCell {
            text: String::new(),
            numeric: None,
        },
    }
}

fn cell_style_flags(worksheet: &Worksheet, col: u32, row: u32) -> (bool, bool, Option<CellAlign>) {
    let Some(cell) = worksheet.get_cell((col, row)) else {
        return (false, false, None);
    };
    let style = cell.get_style();
    let (bold, italic) = style
        .get_font()
        .map(|font| (*font.get_bold(), *font.get_italic()))
        .unwrap_or((false, false));
    let align = style.get_alignment().and_then(|a| match a.get_horizontal() {
        HorizontalAlignmentValues::Left => Some(CellAlign::Left),
        HorizontalAlignmentValues::Center | HorizontalAlignmentValues::CenterContinuous => {
            Some(CellAlign::Center)
        }
        HorizontalAlignmentValues::Right => Some(CellAlign::Right),
        _ => None,
    });
    (bold, italic, align)
}

/// Indent level inferred from leading whitespace in the literal cell text.
fn leading_indent(text: &str) -> u8 {
    let leading = text.len() - text.trim_start().len();
    (leading / 2).min(u8::MAX as usize) as u8
}

fn merge_map(worksheet: &Worksheet) -> MergeMap {
    let mut spans = HashMap::new();
    let mut covered = HashSet::new();

    for range in worksheet.get_merge_cells() {
        let Some(((start_col, start_row), (end_col, end_row))) = parse_range(&range.get_range())
        else {
            continue;
        };
        spans.insert(
            (start_col, start_row),
            (end_row - start_row + 1, end_col - start_col + 1),
        );
        for col in start_col..=end_col {
            for row in start_row..=end_row {
                if (col, row) != (start_col, start_row) {
                    covered.insert((col, row));
                }
            }
        }
    }

    MergeMap { spans, covered }
}

fn parse_range(range: &str) -> Option<((u32, u32), (u32, u32))> {
    let mut parts = range.split(':');
    let a = parts.next()?.trim();
    let b = parts.next().unwrap_or(a).trim();
    let (ac, ar, _, _) = index_from_coordinate(a);
    let (bc, br, _, _) = index_from_coordinate(b);
    let (ac, ar, bc, br) = (ac?, ar?, bc?, br?);
    Some(((ac.min(bc), ar.min(br)), (ac.max(bc), ar.max(br))))
}

/// Explicit column widths when the sheet defines them, otherwise a
/// width-from-character-count heuristic over the column's contents.
fn column_widths(worksheet: &Worksheet, max_col: u32, max_row: u32) -> Vec<u32> {
    let mut explicit: HashMap<u32, f64> = HashMap::new();
    for column in worksheet.get_column_dimensions() {
        let width = *column.get_width();
        if width > 0.0 {
            explicit.insert(*column.get_col_num(), width);
        }
    }

    (1..=max_col)
        .map(|col| match explicit.get(&col) {
            Some(width) => (width * CHAR_WIDTH_PX + CELL_PADDING_PX).round() as u32,
            None => {
                let longest = (1..=max_row)
                    .filter_map(|row| worksheet.get_cell((col, row)))
                    .map(|cell| cell.get_value().trim().chars().count())
                    .max()
                    .unwrap_or(0);
                let px = (longest as f64 * CHAR_WIDTH_PX + 2.0 * CELL_PADDING_PX).round() as u32;
                px.clamp(MIN_COLUMN_PX, MAX_COLUMN_PX)
            }
        })
        .collect()
}
