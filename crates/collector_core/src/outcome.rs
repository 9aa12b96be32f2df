use std::fmt;
use std::path::{Path, PathBuf};

use crate::limits::MIB;
use crate::{InvalidJob, Job, JobIndex};

/// Probe metadata that rules the resource out before any body is transferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// 4xx status or zero declared length.
    NotFound,
    /// Redirect chain longer than allowed.
    TooManyRedirects,
    TooLarge { max_bytes: u64 },
    /// Missing `Content-Type` or one outside the image allow-list.
    InvalidContentType,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotFound => write!(f, "file was not found"),
            Rejection::TooManyRedirects => write!(f, "too many redirects"),
            Rejection::TooLarge { max_bytes } => write!(
                f,
                "file is too large, max available size is {} MB",
                format_megabytes(*max_bytes)
            ),
            Rejection::InvalidContentType => write!(f, "file extension is not allowed"),
        }
    }
}

/// Per-job failure that is not a policy rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInput,
    Timeout,
    Connection,
    /// The full transfer was answered with a non-success status.
    HttpStatus(u16),
    /// Local disk failure while persisting the body.
    Write(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidInput => write!(f, "is not valid URL"),
            FailureKind::Timeout => write!(f, "timeout error"),
            FailureKind::Connection => write!(f, "failed to open TCP connection"),
            FailureKind::HttpStatus(_) => write!(f, "file was not found"),
            FailureKind::Write(detail) => write!(f, "failed to save file: {detail}"),
        }
    }
}

/// Successful end of a job's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Saved(PathBuf),
    SkippedDuplicate(PathBuf),
}

/// Anything that ends a job early. Never crosses the job boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFailure {
    Rejected(Rejection),
    Failed(FailureKind),
}

impl From<Rejection> for JobFailure {
    fn from(rejection: Rejection) -> Self {
        JobFailure::Rejected(rejection)
    }
}

impl From<FailureKind> for JobFailure {
    fn from(kind: FailureKind) -> Self {
        JobFailure::Failed(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Saved { path: PathBuf },
    SkippedDuplicate { path: PathBuf },
    Rejected(Rejection),
    Failed(FailureKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Saved,
    Skipped,
    Rejected,
    Failed,
}

/// Terminal, reported result of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub index: JobIndex,
    pub url: String,
    pub kind: OutcomeKind,
}

impl Outcome {
    pub fn from_result(job: &Job, result: Result<Completion, JobFailure>) -> Self {
        let kind = match result {
            Ok(Completion::Saved(path)) => OutcomeKind::Saved { path },
            Ok(Completion::SkippedDuplicate(path)) => OutcomeKind::SkippedDuplicate { path },
            Err(JobFailure::Rejected(rejection)) => OutcomeKind::Rejected(rejection),
            Err(JobFailure::Failed(kind)) => OutcomeKind::Failed(kind),
        };
        Self {
            index: job.index,
            url: job.raw.clone(),
            kind,
        }
    }

    pub fn invalid_input(invalid: &InvalidJob) -> Self {
        Self {
            index: invalid.index,
            url: invalid.raw.clone(),
            kind: OutcomeKind::Failed(FailureKind::InvalidInput),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.kind {
            OutcomeKind::Saved { path } | OutcomeKind::SkippedDuplicate { path } => Some(path),
            OutcomeKind::Rejected(_) | OutcomeKind::Failed(_) => None,
        }
    }

    pub fn category(&self) -> Category {
        match self.kind {
            OutcomeKind::Saved { .. } => Category::Saved,
            OutcomeKind::SkippedDuplicate { .. } => Category::Skipped,
            OutcomeKind::Rejected(_) => Category::Rejected,
            OutcomeKind::Failed(_) => Category::Failed,
        }
    }
}

/// Renders the single report line for this outcome.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Outcome { index, url, kind } = self;
        match kind {
            OutcomeKind::Saved { path } => write!(
                f,
                "Success: item #{index} - '{url}' was saved as {}",
                path.display()
            ),
            OutcomeKind::SkippedDuplicate { path } => write!(
                f,
                "Info: item #{index} - '{url}' is already saved as {}",
                path.display()
            ),
            OutcomeKind::Rejected(rejection) => {
                write!(f, "Error: item #{index} - '{url}' {rejection}")
            }
            OutcomeKind::Failed(failure) => write!(f, "Error: item #{index} - '{url}' {failure}"),
        }
    }
}

fn format_megabytes(bytes: u64) -> String {
    if bytes % MIB == 0 {
        (bytes / MIB).to_string()
    } else {
        format!("{:.2}", bytes as f64 / MIB as f64)
    }
}
