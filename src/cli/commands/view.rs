use crate::cli::{CommandOutput, RenderMode};
use crate::config::ServerConfig;
use crate::errors::StatementError;
use crate::render::{CollapseState, project, render_html_page, render_text};
use crate::source::SourceRef;
use crate::state::AppState;
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

/// One-shot commands run against a throwaway state; the caches only live for
/// the invocation, so `--refresh` is the only flag that matters for reuse.
fn cli_state() -> Arc<AppState> {
    Arc::new(AppState::new(Arc::new(ServerConfig::default())))
}

pub async fn sheets(source: String) -> Result<CommandOutput> {
    let source = SourceRef::parse(&source)?;
    let template = cli_state().template(&source, false).await?;
    Ok(CommandOutput::Json(json!({
        "source": source.canonical(),
        "sheets": template.sheet_names(),
    })))
}

pub async fn template(source: String, sheet: String) -> Result<CommandOutput> {
    let source = SourceRef::parse(&source)?;
    let template = cli_state().template(&source, false).await?;
    let sheet_model = template
        .find_sheet(&sheet)
        .ok_or_else(|| StatementError::SheetNotFound {
            requested: sheet,
            available: template.sheet_names(),
        })?;
    Ok(CommandOutput::Json(serde_json::to_value(sheet_model)?))
}

pub async fn statement(
    source: String,
    sheet: String,
    collapse: Vec<u32>,
    refresh: bool,
    render: RenderMode,
) -> Result<CommandOutput> {
    let source = SourceRef::parse(&source)?;
    let statement = cli_state().statement(&source, &sheet, refresh).await?;
    let state = CollapseState::from_ids(collapse);

    Ok(match render {
        RenderMode::Text => CommandOutput::Rendered(render_text(&statement, &state)),
        RenderMode::Html => CommandOutput::Rendered(render_html_page(&statement, &state)),
        RenderMode::Json => {
            let rows: Vec<_> = project(&statement.rows, &state)
                .into_iter()
                .map(|visible| {
                    let mut row = serde_json::to_value(visible.row)?;
                    if visible.is_hidden {
                        row["is_hidden"] = json!(true);
                    }
                    Ok(row)
                })
                .collect::<Result<_>>()?;
            CommandOutput::Json(json!({
                "source": statement.source,
                "sheet": statement.sheet,
                "columns": statement.columns,
                "rows": rows,
            }))
        }
    })
}
