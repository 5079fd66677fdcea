pub mod classify;
pub mod template;

use umya_spreadsheet::{Spreadsheet, Worksheet};

pub use template::parse_workbook;

pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    book.get_sheet_collection()
        .iter()
        .map(|s| s.get_name().to_string())
        .collect()
}

/// Resolve a worksheet by name: exact match first, then case-insensitive,
/// then substring in either direction. Returns `None` when nothing matches;
/// callers surface the available names.
pub fn find_sheet<'a>(book: &'a Spreadsheet, name: &str) -> Option<&'a Worksheet> {
    let sheets = book.get_sheet_collection();
    if let Some(sheet) = sheets.iter().find(|s| s.get_name() == name) {
        return Some(sheet);
    }
    let wanted = name.to_lowercase();
    if let Some(sheet) = sheets
        .iter()
        .find(|s| s.get_name().to_lowercase() == wanted)
    {
        return Some(sheet);
    }
    sheets.iter().find(|s| {
        let have = s.get_name().to_lowercase();
        have.contains(&wanted) || wanted.contains(&have)
    })
}
