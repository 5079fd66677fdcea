use crate::cli::OutputFormat;
use crate::errors::StatementError;
use anyhow::{Result, bail};
use serde::Serialize;

pub fn ensure_output_supported(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => Ok(()),
        OutputFormat::Csv => {
            bail!("csv output is not implemented yet for statement-cli; use --format json")
        }
    }
}

/// Machine-readable error printed to stderr on command failure.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_sheets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub try_this: Option<String>,
}

pub fn envelope_for(error: &anyhow::Error) -> ErrorEnvelope {
    if let Some(statement_error) = error.downcast_ref::<StatementError>() {
        return envelope_for_statement_error(statement_error);
    }

    let message = error.to_string();
    if message.contains("csv output is not implemented") {
        return ErrorEnvelope {
            code: "OUTPUT_FORMAT_UNSUPPORTED".to_string(),
            message,
            available_sheets: None,
            try_this: Some("re-run with `--format json`".to_string()),
        };
    }

    ErrorEnvelope {
        code: "COMMAND_FAILED".to_string(),
        message,
        available_sheets: None,
        try_this: None,
    }
}

fn envelope_for_statement_error(error: &StatementError) -> ErrorEnvelope {
    let (code, available_sheets, try_this) = match error {
        StatementError::SheetNotFound { available, .. } => (
            "SHEET_NOT_FOUND",
            Some(available.clone()),
            Some("run `statement-cli sheets <source>` to list valid names".to_string()),
        ),
        StatementError::Fetch { .. } | StatementError::HttpStatus { .. } => (
            "SOURCE_FETCH_FAILED",
            None,
            Some("check the URL and retry".to_string()),
        ),
        StatementError::Read { .. } => (
            "FILE_NOT_READABLE",
            None,
            Some("check the workbook path and permissions".to_string()),
        ),
        StatementError::Decode { .. } => ("WORKBOOK_DECODE_FAILED", None, None),
        StatementError::TooLarge { .. } => ("SOURCE_TOO_LARGE", None, None),
        StatementError::InvalidSource(_) => (
            "INVALID_SOURCE",
            None,
            Some("pass an http(s) URL or a local file path".to_string()),
        ),
    };
    ErrorEnvelope {
        code: code.to_string(),
        message: error.to_string(),
        available_sheets,
        try_this,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_miss_envelope_carries_available_names() {
        let error = anyhow::Error::new(StatementError::SheetNotFound {
            requested: "BS".to_string(),
            available: vec!["Balance Sheet".to_string(), "Notes".to_string()],
        });
        let envelope = envelope_for(&error);
        assert_eq!(envelope.code, "SHEET_NOT_FOUND");
        assert_eq!(
            envelope.available_sheets.as_deref(),
            Some(&["Balance Sheet".to_string(), "Notes".to_string()][..])
        );
    }

    #[test]
    fn unknown_errors_fall_back_to_command_failed() {
        let envelope = envelope_for(&anyhow::anyhow!("boom"));
        assert_eq!(envelope.code, "COMMAND_FAILED");
        assert!(envelope.try_this.is_none());
    }
}
