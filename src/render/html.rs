use super::collapse::{CollapseState, project};
use super::format::format_amount;
use crate::model::Statement;
use std::fmt::Write;

/// Visual-weight rules for the four row classes: line items plain, subtotals
/// a single top border, sections a heavy top border and bold, grand totals
/// bold with a double bottom border.
pub const STATEMENT_CSS: &str = "\
table.statement { border-collapse: collapse; font-variant-numeric: tabular-nums; }
table.statement th, table.statement td { padding: 2px 12px; text-align: right; }
table.statement th:first-child, table.statement td:first-child { text-align: left; }
table.statement tr.subtotal td { border-top: 1px solid #333; font-weight: 500; }
table.statement tr.section td { border-top: 3px solid #111; font-weight: 700; font-size: 1.05em; }
table.statement tr.total td { border-bottom: 3px double #111; font-weight: 700; }
table.statement tr.hidden { visibility: collapse; }
";

const INDENT_STEP_PX: u8 = 16;

/// Render a statement as an HTML table. Hidden rows are kept in the markup
/// with a `hidden` class, mirroring the collapse projection.
pub fn render_html(statement: &Statement, state: &CollapseState) -> String {
    let mut out = String::new();
    out.push_str("<table class=\"statement\">\n<thead><tr><th></th>");
    for column in &statement.columns {
        let _ = write!(out, "<th>{}</th>", escape(column));
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for visible in project(&statement.rows, state) {
        let row = visible.row;
        let mut classes = row.kind.to_string();
        if visible.is_hidden {
            classes.push_str(" hidden");
        }
        let _ = write!(out, "<tr class=\"{classes}\"");
        if let Some(id) = row.section_id {
            let _ = write!(out, " data-section-id=\"{id}\"");
        }
        out.push('>');

        let pad = u32::from(row.indent) * u32::from(INDENT_STEP_PX);
        if pad > 0 {
            let _ = write!(
                out,
                "<td style=\"padding-left: {pad}px\">{}</td>",
                escape(&row.label)
            );
        } else {
            let _ = write!(out, "<td>{}</td>", escape(&row.label));
        }
        for column in &statement.columns {
            let _ = write!(out, "<td>{}</td>", format_amount(row.value(column)));
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n");
    out
}

/// A standalone page wrapping the table with the statement stylesheet.
pub fn render_html_page(statement: &Statement, state: &CollapseState) -> String {
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>\n{STATEMENT_CSS}</style></head>\n<body>\n{}</body></html>\n",
        escape(&statement.sheet),
        render_html(statement, state),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
