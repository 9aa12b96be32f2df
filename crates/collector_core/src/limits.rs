use std::path::PathBuf;
use std::time::Duration;

pub const MIB: u64 = 1024 * 1024;

pub const DEFAULT_MAX_SIZE_MB: u64 = 5;
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;
pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Per-run resource limits, built once at startup and shared read-only by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_size_bytes: u64,
    pub max_redirects: u32,
    /// Applied separately to connection-open and to each read.
    pub request_timeout: Duration,
    /// Transport-level retries after the first attempt.
    pub max_retries: u32,
    pub keep_existing: bool,
    pub destination_dir: PathBuf,
}

impl Limits {
    pub fn new(destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_MB * MIB,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            keep_existing: false,
            destination_dir: destination_dir.into(),
        }
    }

    /// Total attempts allowed for one request, including the first.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// How jobs are spread over the download pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// One job at a time, outcomes in input order.
    #[default]
    Sequential,
    /// A fixed pool of workers fed through a bounded queue.
    Parallel {
        workers: usize,
        queue_capacity: usize,
    },
}

impl Dispatch {
    pub fn parallel() -> Self {
        Dispatch::Parallel {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let limits = Limits::new("/tmp");
        assert_eq!(limits.max_size_bytes, 5 * 1024 * 1024);
        assert_eq!(limits.max_redirects, 5);
        assert_eq!(limits.request_timeout, Duration::from_secs(2));
        assert_eq!(limits.attempts(), 2);
        assert!(!limits.keep_existing);
    }
}
