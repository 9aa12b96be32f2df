use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use collector_core::{Category, Outcome};
use collector_logging::collector_warn;

/// Receives every terminal outcome exactly once. Called concurrently from workers.
pub trait OutcomeSink: Send + Sync {
    fn report(&self, outcome: &Outcome);
}

/// Prints one line per outcome; the stdout lock keeps lines from interleaving.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutcomeSink for StdoutSink {
    fn report(&self, outcome: &Outcome) {
        let mut out = io::stdout().lock();
        if let Err(err) = writeln!(out, "{outcome}") {
            collector_warn!("failed to report item #{}: {}", outcome.index, err);
        }
    }
}

/// Counts of outcomes per category for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub saved: usize,
    pub skipped: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.saved + self.skipped + self.rejected + self.failed
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tally {
    saved: AtomicUsize,
    skipped: AtomicUsize,
    rejected: AtomicUsize,
    failed: AtomicUsize,
}

impl Tally {
    pub(crate) fn record(&self, outcome: &Outcome) {
        let counter = match outcome.category() {
            Category::Saved => &self.saved,
            Category::Skipped => &self.skipped,
            Category::Rejected => &self.rejected,
            Category::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn summary(&self) -> RunSummary {
        RunSummary {
            saved: self.saved.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Delivers an outcome to the sink and counts it.
pub(crate) fn emit(sink: &dyn OutcomeSink, tally: &Tally, outcome: Outcome) {
    tally.record(&outcome);
    sink.report(&outcome);
}
