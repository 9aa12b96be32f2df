use std::io::{self, Write};
use std::path::{Path, PathBuf};

use collector_logging::{collector_trace, collector_warn};
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Destination folder does not exist: {}", .0.display())]
    MissingDestination(PathBuf),
    #[error("destination is not a writable directory: {0}")]
    DestinationNotWritable(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Verifies that the destination directory already exists and accepts files.
///
/// Unlike a mkdir-style helper this never creates anything: a missing
/// destination is a fatal configuration error.
pub fn ensure_destination_dir(dir: &Path) -> Result<(), PersistError> {
    if !dir.is_dir() {
        return Err(PersistError::MissingDestination(dir.to_path_buf()));
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::DestinationNotWritable(e.to_string()))?;
    Ok(())
}

/// A download in progress: chunks land in a hidden temp file next to the
/// target, which is renamed over the target only on [`PendingFile::commit`].
///
/// The target path therefore never holds a truncated body.
pub struct PendingFile {
    target: PathBuf,
    temp: NamedTempFile,
}

impl PendingFile {
    pub fn create(target: &Path) -> Result<Self, PersistError> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = Builder::new().prefix(".partial-").tempfile_in(dir)?;
        Ok(Self {
            target: target.to_path_buf(),
            temp,
        })
    }

    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.temp.write_all(chunk)?;
        Ok(())
    }

    pub fn commit(mut self) -> Result<PathBuf, PersistError> {
        self.temp.flush()?;
        self.temp.as_file_mut().sync_all()?;
        self.temp
            .persist(&self.target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(self.target)
    }

    /// Removes the partial data. A failed removal is logged, never returned,
    /// so it cannot hide the error that caused the discard.
    pub fn discard(self) {
        let temp_path = self.temp.path().to_path_buf();
        match self.temp.close() {
            Ok(()) => collector_trace!("removed partial download {:?}", temp_path),
            Err(err) => collector_warn!(
                "failed to remove partial download {:?} for {:?}: {}",
                temp_path,
                self.target,
                err
            ),
        }
    }
}
