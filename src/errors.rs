use thiserror::Error;

/// Library error taxonomy. Load failures, lookup misses, and validation
/// problems stay distinguishable so callers can map them to retryable vs
/// terminal surfaces.
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("'{url}' returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("workbook at '{source_ref}' exceeds the {limit_bytes}-byte download limit")]
    TooLarge { source_ref: String, limit_bytes: u64 },

    #[error("failed to read '{source_ref}': {cause}")]
    Read {
        source_ref: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("failed to decode workbook from '{source_ref}': {reason}")]
    Decode { source_ref: String, reason: String },

    #[error("sheet '{requested}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("unsupported source '{0}' (expected an http(s) URL or a file path)")]
    InvalidSource(String),
}

impl StatementError {
    /// True for failures a user-initiated refresh may clear.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StatementError::Fetch { .. }
                | StatementError::HttpStatus { .. }
                | StatementError::Read { .. }
        )
    }
}
