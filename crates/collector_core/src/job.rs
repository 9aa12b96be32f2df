use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// 1-based position of a segment in the source list.
pub type JobIndex = usize;

/// A syntactically valid candidate, ready for the download pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub index: JobIndex,
    /// Trimmed segment exactly as it appeared in the source.
    pub raw: String,
    pub url: Url,
}

/// A segment that did not parse as an `http`/`https` URL with a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidJob {
    pub index: JobIndex,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceItem {
    Job(Job),
    Invalid(InvalidJob),
}

impl SourceItem {
    pub fn index(&self) -> JobIndex {
        match self {
            SourceItem::Job(job) => job.index,
            SourceItem::Invalid(invalid) => invalid.index,
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source file does not exist: {}", path.display())]
    Missing { path: PathBuf },
    #[error("failed to open source {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read source: {0}")]
    Read(#[from] io::Error),
}

/// Boundary between two candidates in the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    /// Any run of ASCII whitespace.
    #[default]
    Whitespace,
    Byte(u8),
}

impl Separator {
    fn matches(self, byte: u8) -> bool {
        match self {
            Separator::Whitespace => byte.is_ascii_whitespace(),
            Separator::Byte(sep) => byte == sep,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeparatorError {
    #[error("separator must not be empty")]
    Empty,
    #[error("separator must be a single ASCII character, got {0:?}")]
    NotSingleAscii(String),
}

impl FromStr for Separator {
    type Err = SeparatorError;

    /// Accepts one ASCII character or the escapes `\n`, `\t`, `\r` and `\s` (whitespace).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(SeparatorError::Empty),
            "\\s" | "whitespace" => Ok(Separator::Whitespace),
            "\\n" => Ok(Separator::Byte(b'\n')),
            "\\t" => Ok(Separator::Byte(b'\t')),
            "\\r" => Ok(Separator::Byte(b'\r')),
            other => match other.as_bytes() {
                [byte] if byte.is_ascii() => Ok(Separator::Byte(*byte)),
                _ => Err(SeparatorError::NotSingleAscii(other.to_string())),
            },
        }
    }
}

/// Parses a trimmed segment into a candidate URL, or `None` when it is not
/// an absolute `http`/`https` URL with a non-empty host.
pub fn parse_candidate(segment: &str) -> Option<Url> {
    let url = Url::parse(segment).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Some(url),
        _ => None,
    }
}

/// Lazily splits a byte stream into indexed candidates.
///
/// Segments are read one at a time, so the whole input is never held in
/// memory. Every segment consumes an index, so with a newline separator the
/// index is the line number. Segments that are empty after trimming are
/// skipped without being reported. To restart, open a new source.
pub struct JobSource<R> {
    reader: R,
    separator: Separator,
    index: JobIndex,
    exhausted: bool,
}

impl JobSource<BufReader<File>> {
    pub fn open(path: &Path, separator: Separator) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SourceError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                SourceError::Open {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Ok(Self::new(BufReader::new(file), separator))
    }
}

impl<R: BufRead> JobSource<R> {
    pub fn new(reader: R, separator: Separator) -> Self {
        Self {
            reader,
            separator,
            index: 0,
            exhausted: false,
        }
    }

    fn read_segment(&mut self) -> io::Result<Option<Vec<u8>>> {
        if self.exhausted {
            return Ok(None);
        }
        if self.separator == Separator::Whitespace {
            self.skip_whitespace()?;
        }
        let separator = self.separator;
        let mut segment = Vec::new();
        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                self.exhausted = true;
                // An empty tail after the final separator is not a segment.
                return Ok((!segment.is_empty()).then_some(segment));
            }
            match available.iter().position(|byte| separator.matches(*byte)) {
                Some(pos) => {
                    segment.extend_from_slice(&available[..pos]);
                    self.reader.consume(pos + 1);
                    return Ok(Some(segment));
                }
                None => {
                    let len = available.len();
                    segment.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }

    fn skip_whitespace(&mut self) -> io::Result<()> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            let len = available.len();
            let skipped = available
                .iter()
                .take_while(|byte| byte.is_ascii_whitespace())
                .count();
            self.reader.consume(skipped);
            if len == 0 || skipped < len {
                return Ok(());
            }
        }
    }
}

impl<R: BufRead> Iterator for JobSource<R> {
    type Item = Result<SourceItem, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let segment = match self.read_segment() {
                Ok(Some(segment)) => segment,
                Ok(None) => return None,
                Err(err) => {
                    self.exhausted = true;
                    return Some(Err(SourceError::Read(err)));
                }
            };
            self.index += 1;
            let text = String::from_utf8_lossy(&segment);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }

            let raw = trimmed.to_string();
            let item = match parse_candidate(&raw) {
                Some(url) => SourceItem::Job(Job {
                    index: self.index,
                    raw,
                    url,
                }),
                None => SourceItem::Invalid(InvalidJob {
                    index: self.index,
                    raw,
                }),
            };
            return Some(Ok(item));
        }
    }
}
