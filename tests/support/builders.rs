#![allow(dead_code)]
use umya_spreadsheet::{Spreadsheet, Worksheet};

pub fn label(sheet: &mut Worksheet, cell: &str, text: &str) {
    sheet.get_cell_mut(cell).set_value(text);
}

/// Bold label, the style signal the template classifier keys on.
pub fn heading(sheet: &mut Worksheet, cell: &str, text: &str) {
    label(sheet, cell, text);
    sheet.get_style_mut(cell).get_font_mut().set_bold(true);
}

pub fn amount(sheet: &mut Worksheet, cell: &str, value: f64) {
    sheet.get_cell_mut(cell).set_value_number(value);
}

pub fn merge(sheet: &mut Worksheet, range: &str) {
    sheet.add_merge_cells(range);
}

/// Explicit width in Excel character units.
pub fn column_width(sheet: &mut Worksheet, column: &str, width: f64) {
    sheet.get_column_dimension_mut(column).set_width(width);
}

/// Two-period statement of financial position covering the shapes the
/// pipeline must handle: a merged title, a spacing row, a date header row,
/// two sections, indented line items, a subtotal per section, a grand total,
/// plus negative and zero amounts.
///
/// Layout (rows 1-11):
///   1  Statement of Financial Position   (bold, merged A1:C1)
///   2  (blank)
///   3            31-Dec-24   31-Dec-23
///   4  ASSETS                            (bold)
///   5    Cash and cash equivalents       1,234,567       900
///   6    Trade and other receivables        (1,234)        —
///   7  Total current assets              1,233,333       900
///   8  EQUITY AND LIABILITIES            (bold)
///   9    Borrowings                             50        60
///  10  Total borrowings                         50        60
///  11  TOTAL ASSETS                      1,233,383       960
pub fn balance_sheet(sheet: &mut Worksheet) {
    merge(sheet, "A1:C1");
    heading(sheet, "A1", "Statement of Financial Position");

    label(sheet, "B3", "31-Dec-24");
    label(sheet, "C3", "31-Dec-23");

    heading(sheet, "A4", "ASSETS");
    label(sheet, "A5", "  Cash and cash equivalents");
    amount(sheet, "B5", 1_234_567.0);
    amount(sheet, "C5", 900.0);
    label(sheet, "A6", "  Trade and other receivables");
    amount(sheet, "B6", -1234.0);
    amount(sheet, "C6", 0.0);
    label(sheet, "A7", "Total current assets");
    amount(sheet, "B7", 1_233_333.0);
    amount(sheet, "C7", 900.0);

    heading(sheet, "A8", "EQUITY AND LIABILITIES");
    label(sheet, "A9", "  Borrowings");
    amount(sheet, "B9", 50.0);
    amount(sheet, "C9", 60.0);
    label(sheet, "A10", "Total borrowings");
    amount(sheet, "B10", 50.0);
    amount(sheet, "C10", 60.0);

    label(sheet, "A11", "TOTAL ASSETS");
    amount(sheet, "B11", 1_233_383.0);
    amount(sheet, "C11", 960.0);

    column_width(sheet, "A", 40.0);
}

/// Minimal sheet with no date-like header, forcing the extractor's fallback
/// column inference. Mirrors the canonical three-row scenario: a bold
/// section, one line item, one grand total.
pub fn headerless_statement(sheet: &mut Worksheet) {
    heading(sheet, "A1", "ASSETS");
    label(sheet, "A2", "Cash");
    amount(sheet, "B2", 100.0);
    amount(sheet, "C2", 90.0);
    label(sheet, "A3", "TOTAL ASSETS");
    amount(sheet, "B3", 100.0);
    amount(sheet, "C3", 90.0);
}

/// Rename the default sheet and return it for population.
pub fn primary_sheet<'a>(book: &'a mut Spreadsheet, name: &str) -> &'a mut Worksheet {
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .expect("default sheet exists");
    sheet.set_name(name);
    sheet
}

/// Workbook with a balance sheet under `sheet_name` plus a "Notes" sheet, the
/// standard fixture for sheet-lookup and end-to-end tests.
pub fn statement_workbook(book: &mut Spreadsheet, sheet_name: &str) {
    balance_sheet(primary_sheet(book, sheet_name));
    let notes = book.new_sheet("Notes").expect("add notes sheet");
    label(notes, "A1", "Basis of preparation");
}
