//! Settings resolution: CLI flag, then RON config file, then built-in default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use collector_core::{
    Dispatch, Limits, Separator, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_MAX_SIZE_MB,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS, MIB,
};
use collector_logging::collector_info;
use serde::Deserialize;

use crate::cli::Cli;

/// Optional settings file. Every field may be omitted.
///
/// ```ron
/// #![enable(implicit_some)]
/// (
///     destination: "/srv/images",
///     concurrently: true,
///     max_size_mb: 10,
///     separator: "\\n",
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub from: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub concurrently: Option<bool>,
    pub max_size_mb: Option<u64>,
    pub max_redirects: Option<u32>,
    pub max_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub keep: Option<bool>,
    pub separator: Option<String>,
    pub workers: Option<usize>,
    pub queue_capacity: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = ron::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        collector_info!("Loaded settings from {:?}", path);
        Ok(config)
    }
}

/// Everything a run needs, fixed before any work starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: PathBuf,
    pub separator: Separator,
    pub limits: Limits,
    pub dispatch: Dispatch,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let Some(source) = cli.from.clone().or(file.from) else {
            bail!("no source file given; pass --from or set `from` in the config file");
        };
        let destination = cli
            .destination
            .clone()
            .or(file.destination)
            .unwrap_or_else(std::env::temp_dir);

        let separator = match (cli.separator, file.separator.as_deref()) {
            (Some(separator), _) => separator,
            (None, Some(raw)) => raw
                .parse()
                .with_context(|| format!("invalid separator {raw:?} in config file"))?,
            (None, None) => Separator::Whitespace,
        };

        let max_size_mb = cli.max_size.or(file.max_size_mb).unwrap_or(DEFAULT_MAX_SIZE_MB);
        let Some(max_size_bytes) = max_size_mb.checked_mul(MIB) else {
            bail!("max size of {max_size_mb} MB is out of range");
        };
        let timeout_secs = cli
            .max_timeout
            .or(file.max_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("max timeout must be at least one second");
        }

        let limits = Limits {
            max_size_bytes,
            max_redirects: cli
                .max_redirects
                .or(file.max_redirects)
                .unwrap_or(DEFAULT_MAX_REDIRECTS),
            request_timeout: Duration::from_secs(timeout_secs),
            max_retries: cli.max_retries.or(file.max_retries).unwrap_or(DEFAULT_MAX_RETRIES),
            keep_existing: cli.keep || file.keep.unwrap_or(false),
            destination_dir: destination,
        };

        let dispatch = if cli.concurrently || file.concurrently.unwrap_or(false) {
            let workers = cli.workers.or(file.workers).unwrap_or(DEFAULT_WORKERS);
            let queue_capacity = cli
                .queue_capacity
                .or(file.queue_capacity)
                .unwrap_or(DEFAULT_QUEUE_CAPACITY);
            if workers == 0 || queue_capacity == 0 {
                bail!("workers and queue capacity must both be at least 1");
            }
            Dispatch::Parallel {
                workers,
                queue_capacity,
            }
        } else {
            Dispatch::Sequential
        };

        Ok(Self {
            source,
            separator,
            limits,
            dispatch,
        })
    }
}
