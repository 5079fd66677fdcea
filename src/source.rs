use crate::errors::StatementError;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use umya_spreadsheet::Spreadsheet;

/// A statement source: an http(s) URL fetched over the network, or a local
/// workbook path. The canonical string doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceRef {
    Url(String),
    Path(PathBuf),
}

impl SourceRef {
    pub fn parse(input: &str) -> Result<Self, StatementError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(StatementError::InvalidSource(input.to_string()));
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(SourceRef::Url(trimmed.to_string()));
        }
        if trimmed.contains("://") {
            return Err(StatementError::InvalidSource(input.to_string()));
        }
        Ok(SourceRef::Path(PathBuf::from(trimmed)))
    }

    pub fn canonical(&self) -> String {
        match self {
            SourceRef::Url(url) => url.clone(),
            SourceRef::Path(path) => path.display().to_string(),
        }
    }
}

impl std::str::FromStr for SourceRef {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceRef::parse(s)
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Fetches workbook bytes. Nothing is retried here; a refresh is always a
/// caller-initiated re-invocation.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: u64,
}

impl SourceLoader {
    pub fn new(timeout: Duration, max_bytes: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
            max_bytes,
        }
    }

    pub async fn fetch_bytes(&self, source: &SourceRef) -> Result<Vec<u8>, StatementError> {
        let bytes = match source {
            SourceRef::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .timeout(self.timeout)
                    .send()
                    .await
                    .map_err(|e| StatementError::Fetch {
                        url: url.clone(),
                        reason: e.to_string(),
                    })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(StatementError::HttpStatus {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response
                    .bytes()
                    .await
                    .map_err(|e| StatementError::Fetch {
                        url: url.clone(),
                        reason: e.to_string(),
                    })?
                    .to_vec()
            }
            SourceRef::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|e| StatementError::Read {
                        source_ref: path.display().to_string(),
                        cause: e,
                    })?
            }
        };

        if bytes.len() as u64 > self.max_bytes {
            return Err(StatementError::TooLarge {
                source_ref: source.canonical(),
                limit_bytes: self.max_bytes,
            });
        }
        tracing::debug!(source = %source, bytes = bytes.len(), "fetched workbook");
        Ok(bytes)
    }
}

/// Decode a workbook with style and number-format metadata retained. CPU
/// bound; callers run it under `spawn_blocking`.
pub fn decode_workbook(bytes: Vec<u8>, source: &SourceRef) -> Result<Spreadsheet, StatementError> {
    umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true).map_err(|e| {
        StatementError::Decode {
            source_ref: source.canonical(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths_are_distinguished() {
        assert!(matches!(
            SourceRef::parse("https://example.com/fs.xlsx"),
            Ok(SourceRef::Url(_))
        ));
        assert!(matches!(
            SourceRef::parse("reports/fs.xlsx"),
            Ok(SourceRef::Path(_))
        ));
        assert!(SourceRef::parse("ftp://example.com/fs.xlsx").is_err());
        assert!(SourceRef::parse("  ").is_err());
    }
}
