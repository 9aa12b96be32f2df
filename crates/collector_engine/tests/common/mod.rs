#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use collector_core::{JobSource, Limits, Outcome, Separator};
use collector_engine::OutcomeSink;
use wiremock::ResponseTemplate;

#[derive(Default)]
pub struct MemorySink {
    outcomes: Mutex<Vec<Outcome>>,
}

impl MemorySink {
    /// Reported outcomes ordered by job index.
    pub fn outcomes(&self) -> Vec<Outcome> {
        let mut outcomes = self.outcomes.lock().unwrap().clone();
        outcomes.sort_by_key(|outcome| outcome.index);
        outcomes
    }

    /// Outcomes in the order they were reported.
    pub fn reported(&self) -> Vec<Outcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl OutcomeSink for MemorySink {
    fn report(&self, outcome: &Outcome) {
        self.outcomes.lock().unwrap().push(outcome.clone());
    }
}

pub fn limits(dir: &Path) -> Limits {
    Limits {
        request_timeout: Duration::from_millis(500),
        max_retries: 0,
        ..Limits::new(dir)
    }
}

pub fn source(text: &str) -> JobSource<Cursor<Vec<u8>>> {
    JobSource::new(Cursor::new(text.as_bytes().to_vec()), Separator::Whitespace)
}

/// A response whose body (and therefore Content-Length) has `len` bytes.
pub fn image(content_type: &str, len: usize) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(vec![b'x'; len], content_type)
}

pub fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("Location", location)
}

/// Files in `dir`, including hidden partial downloads.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
