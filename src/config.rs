use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CACHE_CAPACITY: usize = 16;
const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8086";
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub http_bind_address: SocketAddr,
    /// Capacity of each of the two parse caches (templates and statements).
    pub cache_capacity: usize,
    pub fetch_timeout: Duration,
    pub max_download_bytes: u64,
    /// Sheet used when a request names none.
    pub default_sheet: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_bind_address: DEFAULT_HTTP_BIND.parse().unwrap(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
            default_sheet: None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "statement-kit", version, about = "Financial statement view server")]
pub struct CliArgs {
    /// Optional YAML config file; CLI flags override its values.
    #[arg(long, env = "STATEMENT_KIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "STATEMENT_KIT_BIND")]
    pub bind: Option<SocketAddr>,

    #[arg(long)]
    pub cache_capacity: Option<usize>,

    #[arg(long)]
    pub fetch_timeout_ms: Option<u64>,

    #[arg(long)]
    pub max_download_bytes: Option<u64>,

    #[arg(long)]
    pub default_sheet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    bind: Option<SocketAddr>,
    cache_capacity: Option<usize>,
    fetch_timeout_ms: Option<u64>,
    max_download_bytes: Option<u64>,
    default_sheet: Option<String>,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let file = match args.config.as_ref() {
            Some(path) => load_config_file(path)?,
            None => PartialConfig::default(),
        };
        let defaults = ServerConfig::default();

        let cache_capacity = args
            .cache_capacity
            .or(file.cache_capacity)
            .unwrap_or(defaults.cache_capacity);
        anyhow::ensure!(cache_capacity > 0, "cache capacity must be at least 1");

        let max_download_bytes = args
            .max_download_bytes
            .or(file.max_download_bytes)
            .unwrap_or(defaults.max_download_bytes);
        anyhow::ensure!(max_download_bytes > 0, "max download bytes must be at least 1");

        Ok(Self {
            http_bind_address: args.bind.or(file.bind).unwrap_or(defaults.http_bind_address),
            cache_capacity,
            fetch_timeout: Duration::from_millis(
                args.fetch_timeout_ms
                    .or(file.fetch_timeout_ms)
                    .unwrap_or(DEFAULT_FETCH_TIMEOUT_MS),
            ),
            max_download_bytes,
            default_sheet: args.default_sheet.or(file.default_sheet),
        })
    }
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}
