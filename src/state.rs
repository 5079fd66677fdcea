use crate::config::ServerConfig;
use crate::errors::StatementError;
use crate::model::{ParsedTemplate, Statement};
use crate::parser::parse_workbook;
use crate::source::{SourceLoader, SourceRef, decode_workbook};
use crate::statement::extract_statement;
use anyhow::Result;
use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::task;

/// Shared application state: configuration plus the two parse caches. The
/// template parser and the statement extractor are independent paths and
/// each keeps its own cache; a source cached by one is not visible to the
/// other.
pub struct AppState {
    config: Arc<ServerConfig>,
    loader: SourceLoader,
    templates: RwLock<LruCache<String, Arc<ParsedTemplate>>>,
    statements: RwLock<LruCache<(String, String), Arc<Statement>>>,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity.max(1)).unwrap();
        let loader = SourceLoader::new(config.fetch_timeout, config.max_download_bytes);
        Self {
            config,
            loader,
            templates: RwLock::new(LruCache::new(capacity)),
            statements: RwLock::new(LruCache::new(capacity)),
        }
    }

    pub fn config(&self) -> Arc<ServerConfig> {
        self.config.clone()
    }

    pub async fn sheet_names(&self, source: &SourceRef) -> Result<Vec<String>> {
        Ok(self.template(source, false).await?.sheet_names())
    }

    /// Full template model for a source. A cached source is not re-fetched;
    /// `refresh` drops the entry first and is always caller-initiated.
    pub async fn template(&self, source: &SourceRef, refresh: bool) -> Result<Arc<ParsedTemplate>> {
        let key = source.canonical();
        if refresh {
            self.templates.write().pop(&key);
        } else if let Some(entry) = self.templates.write().get(&key) {
            tracing::debug!(source = %key, "template cache hit");
            return Ok(entry.clone());
        }

        let bytes = self.loader.fetch_bytes(source).await?;
        let source = source.clone();
        let parsed = task::spawn_blocking(move || -> Result<ParsedTemplate, StatementError> {
            let book = decode_workbook(bytes, &source)?;
            Ok(parse_workbook(&book, &source.canonical()))
        })
        .await??;

        let parsed = Arc::new(parsed);
        self.templates.write().put(key, parsed.clone());
        Ok(parsed)
    }

    /// Flat statement for one sheet of a source, via the extraction path and
    /// its own cache.
    pub async fn statement(
        &self,
        source: &SourceRef,
        sheet: &str,
        refresh: bool,
    ) -> Result<Arc<Statement>> {
        let key = (source.canonical(), sheet.to_lowercase());
        if refresh {
            self.statements.write().pop(&key);
        } else if let Some(entry) = self.statements.write().get(&key) {
            tracing::debug!(source = %key.0, sheet = %key.1, "statement cache hit");
            return Ok(entry.clone());
        }

        let bytes = self.loader.fetch_bytes(source).await?;
        let source = source.clone();
        let sheet = sheet.to_string();
        let statement = task::spawn_blocking(move || -> Result<Statement, StatementError> {
            let book = decode_workbook(bytes, &source)?;
            extract_statement(&book, &sheet, &source.canonical())
        })
        .await??;

        let statement = Arc::new(statement);
        self.statements.write().put(key, statement.clone());
        Ok(statement)
    }

    /// Drop every cached entry for a source, in both caches.
    pub fn evict_source(&self, source: &SourceRef) {
        let canonical = source.canonical();
        self.templates.write().pop(&canonical);

        let stale: Vec<(String, String)> = self
            .statements
            .read()
            .iter()
            .filter(|((cached_source, _), _)| *cached_source == canonical)
            .map(|(key, _)| key.clone())
            .collect();
        let mut statements = self.statements.write();
        for key in stale {
            statements.pop(&key);
        }
    }
}
