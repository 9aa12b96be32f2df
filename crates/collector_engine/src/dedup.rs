use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use collector_core::ProbeResult;

/// Decides whether an existing file can stand in for a fresh transfer.
///
/// Only with `keep_existing`, and only when the file on disk is strictly
/// newer than the probe's `Last-Modified`. A missing header, a missing file or
/// an unreadable mtime all mean "download again".
pub fn should_skip(destination: &Path, probe: &ProbeResult, keep_existing: bool) -> bool {
    if !keep_existing {
        return false;
    }
    let Some(last_modified) = probe.last_modified else {
        return false;
    };
    let Ok(metadata) = fs::metadata(destination) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    DateTime::<Utc>::from(modified) > last_modified
}
