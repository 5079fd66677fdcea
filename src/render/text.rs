use super::collapse::{CollapseState, project};
use super::format::format_amount;
use crate::model::{RowKind, Statement};

const INDENT_STEP: usize = 2;
const COLUMN_GAP: usize = 2;

/// Render a statement as an aligned plain-text table for terminal output.
/// Collapsed rows are dropped entirely; rules above subtotals and sections
/// and below grand totals stand in for the HTML border weights.
pub fn render_text(statement: &Statement, state: &CollapseState) -> String {
    let visible: Vec<_> = project(&statement.rows, state)
        .into_iter()
        .filter(|v| !v.is_hidden)
        .collect();

    let label_width = visible
        .iter()
        .map(|v| v.row.label.len() + v.row.indent as usize * INDENT_STEP)
        .chain(std::iter::once(statement.sheet.len()))
        .max()
        .unwrap_or(0);

    let value_widths: Vec<usize> = statement
        .columns
        .iter()
        .map(|column| {
            visible
                .iter()
                .map(|v| format_amount(v.row.value(column)).len())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let total_width = label_width
        + value_widths
            .iter()
            .map(|w| w + COLUMN_GAP)
            .sum::<usize>();

    let mut out = String::new();
    out.push_str(&format!("{:<label_width$}", statement.sheet));
    for (column, width) in statement.columns.iter().zip(value_widths.iter().copied()) {
        out.push_str(&" ".repeat(COLUMN_GAP));
        out.push_str(&format!("{column:>width$}"));
    }
    out.push('\n');
    out.push_str(&"=".repeat(total_width));
    out.push('\n');

    for v in &visible {
        match v.row.kind {
            RowKind::Section => out.push_str(&format!("{}\n", "=".repeat(total_width))),
            RowKind::Subtotal => out.push_str(&format!("{}\n", "-".repeat(total_width))),
            _ => {}
        }

        let indented = format!(
            "{}{}",
            " ".repeat(v.row.indent as usize * INDENT_STEP),
            v.row.label
        );
        out.push_str(&format!("{indented:<label_width$}"));
        for (column, width) in statement.columns.iter().zip(value_widths.iter().copied()) {
            out.push_str(&" ".repeat(COLUMN_GAP));
            out.push_str(&format!("{:>width$}", format_amount(v.row.value(column))));
        }
        out.push('\n');

        if v.row.kind.is_total() {
            out.push_str(&format!("{}\n", "=".repeat(total_width)));
        }
    }

    out
}
