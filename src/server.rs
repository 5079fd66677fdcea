use crate::errors::StatementError;
use crate::render::{CollapseState, render_html_page};
use crate::source::SourceRef;
use crate::state::AppState;
use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

/// HTTP surface over the parse/extract/render pipeline. Every endpoint is a
/// read; refreshes are explicit query flags, never automatic.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/sheets", get(list_sheets))
        .route("/api/template", get(template))
        .route("/api/statement", get(statement))
        .route("/api/statement/html", get(statement_html))
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let address = state.config().http_bind_address;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(%address, "statement service listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutdown requested");
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SourceParams {
    /// http(s) URL or local path of the workbook.
    pub source: String,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SheetParams {
    pub source: String,
    /// Sheet name; the configured default sheet applies when omitted.
    pub sheet: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HtmlParams {
    pub source: String,
    pub sheet: Option<String>,
    /// Comma-separated section ids to render collapsed.
    pub collapsed: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn list_sheets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SourceParams>,
) -> Result<Json<Value>, ApiError> {
    let source = SourceRef::parse(&params.source)?;
    let template = state.template(&source, params.refresh).await?;
    Ok(Json(json!({
        "source": source.canonical(),
        "sheets": template.sheet_names(),
    })))
}

async fn template(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SheetParams>,
) -> Result<Json<Value>, ApiError> {
    let source = SourceRef::parse(&params.source)?;
    let template = state.template(&source, params.refresh).await?;

    let Some(requested) = requested_sheet(&state, params.sheet) else {
        return Ok(Json(serde_json::to_value(&*template)?));
    };
    let sheet = template
        .find_sheet(&requested)
        .ok_or_else(|| StatementError::SheetNotFound {
            requested,
            available: template.sheet_names(),
        })?;
    Ok(Json(serde_json::to_value(sheet)?))
}

async fn statement(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SheetParams>,
) -> Result<Json<Value>, ApiError> {
    let source = SourceRef::parse(&params.source)?;
    let sheet = requested_sheet(&state, params.sheet)
        .ok_or_else(|| ApiError::bad_request("a 'sheet' query parameter is required"))?;
    let statement = state.statement(&source, &sheet, params.refresh).await?;
    Ok(Json(serde_json::to_value(&*statement)?))
}

async fn statement_html(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HtmlParams>,
) -> Result<Html<String>, ApiError> {
    let source = SourceRef::parse(&params.source)?;
    let sheet = requested_sheet(&state, params.sheet)
        .ok_or_else(|| ApiError::bad_request("a 'sheet' query parameter is required"))?;
    let collapse = parse_collapsed(params.collapsed.as_deref())?;
    let statement = state.statement(&source, &sheet, params.refresh).await?;
    Ok(Html(render_html_page(&statement, &collapse)))
}

fn requested_sheet(state: &AppState, sheet: Option<String>) -> Option<String> {
    sheet
        .filter(|s| !s.trim().is_empty())
        .or_else(|| state.config().default_sheet.clone())
}

fn parse_collapsed(raw: Option<&str>) -> Result<CollapseState, ApiError> {
    let Some(raw) = raw else {
        return Ok(CollapseState::new());
    };
    let mut ids = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let id: u32 = part.trim().parse().map_err(|_| {
            ApiError::bad_request(format!("'{part}' is not a valid section id"))
        })?;
        ids.push(id);
    }
    Ok(CollapseState::from_ids(ids))
}

/// Maps the library error taxonomy onto HTTP statuses: load failures are 502,
/// sheet lookups 404, validation 400, anything else 500. The body is always a
/// JSON `{error}` object.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<StatementError> for ApiError {
    fn from(error: StatementError) -> Self {
        let status = match &error {
            StatementError::Fetch { .. }
            | StatementError::HttpStatus { .. }
            | StatementError::Read { .. }
            | StatementError::Decode { .. } => StatusCode::BAD_GATEWAY,
            StatementError::SheetNotFound { .. } => StatusCode::NOT_FOUND,
            StatementError::InvalidSource(_) | StatementError::TooLarge { .. } => {
                StatusCode::BAD_REQUEST
            }
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<StatementError>() {
            Ok(statement_error) => statement_error.into(),
            Err(other) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, message = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_param_accepts_lists_and_rejects_junk() {
        assert!(parse_collapsed(None).unwrap().collapsed_ids().next().is_none());
        let state = parse_collapsed(Some("1,3")).unwrap();
        assert!(state.is_collapsed(1) && state.is_collapsed(3) && !state.is_collapsed(2));
        assert!(parse_collapsed(Some("1,x")).is_err());
    }

    #[test]
    fn statement_errors_map_to_http_statuses() {
        let missing: ApiError = StatementError::SheetNotFound {
            requested: "BS".into(),
            available: vec!["Notes".into()],
        }
        .into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert!(missing.message.contains("Notes"));

        let fetch: ApiError = StatementError::HttpStatus {
            url: "https://example.com/fs.xlsx".into(),
            status: 503,
        }
        .into();
        assert_eq!(fetch.status, StatusCode::BAD_GATEWAY);

        let invalid: ApiError = StatementError::InvalidSource("ftp://x".into()).into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    }
}
