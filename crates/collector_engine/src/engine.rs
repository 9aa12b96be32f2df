use std::io::BufRead;
use std::sync::Arc;

use collector_core::{
    validate, Completion, Dispatch, Job, JobFailure, JobSource, Limits, Outcome, SourceError,
    SourceItem, Stage,
};
use collector_logging::{collector_debug, collector_error, collector_info};
use tokio::sync::{mpsc, Mutex};

use crate::sink::{emit, Tally};
use crate::{
    build_client, destination_path, should_skip, EngineError, Fetcher, OutcomeSink, Prober,
    ReqwestFetcher, ReqwestProber, RunSummary,
};

enum WorkerMessage {
    Job(Job),
    Terminate,
}

type SharedQueue = Arc<Mutex<mpsc::Receiver<WorkerMessage>>>;

/// Drives every job from its source through probe, validation, dedup and
/// transfer, reporting exactly one outcome per job.
#[derive(Clone)]
pub struct Collector {
    limits: Arc<Limits>,
    prober: Arc<dyn Prober>,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn OutcomeSink>,
}

impl Collector {
    /// Builds a collector backed by one shared HTTP client.
    pub fn new(limits: Limits, sink: Arc<dyn OutcomeSink>) -> Result<Self, EngineError> {
        let client = build_client(&limits)?;
        let prober = Arc::new(ReqwestProber::new(client.clone(), &limits));
        let fetcher = Arc::new(ReqwestFetcher::new(client, &limits));
        Ok(Self::with_transport(limits, prober, fetcher, sink))
    }

    pub fn with_transport(
        limits: Limits,
        prober: Arc<dyn Prober>,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self {
            limits: Arc::new(limits),
            prober,
            fetcher,
            sink,
        }
    }

    /// Consumes the whole source. Returns once every job has been reported.
    ///
    /// A read failure in the source stops intake; jobs already queued are still
    /// drained before the error is returned.
    pub async fn run<R>(
        &self,
        source: JobSource<R>,
        dispatch: Dispatch,
    ) -> Result<RunSummary, EngineError>
    where
        R: BufRead + Send + 'static,
    {
        collector_info!(
            "collecting into {:?} ({:?})",
            self.limits.destination_dir,
            dispatch
        );
        match dispatch {
            Dispatch::Sequential => self.run_sequential(source).await,
            Dispatch::Parallel {
                workers,
                queue_capacity,
            } => self.run_parallel(source, workers, queue_capacity).await,
        }
    }

    /// Runs one job's pipeline to its terminal outcome. Never fails: every
    /// error is folded into the returned outcome.
    pub async fn process(&self, job: &Job) -> Outcome {
        let result = self.pipeline(job).await;
        log_stage(job, Stage::Done);
        Outcome::from_result(job, result)
    }

    async fn pipeline(&self, job: &Job) -> Result<Completion, JobFailure> {
        let limits = self.limits.as_ref();

        log_stage(job, Stage::ProbeInFlight);
        let probe = self.prober.probe(&job.url).await?;
        let accepted = validate(&probe, limits)?;
        let destination = destination_path(&job.url, accepted.extension, &limits.destination_dir);

        log_stage(job, Stage::DedupCheck);
        if should_skip(&destination, &probe, limits.keep_existing) {
            return Ok(Completion::SkippedDuplicate(destination));
        }

        log_stage(job, Stage::DownloadInFlight);
        let path = self.fetcher.fetch(&probe.final_url, &destination).await?;
        Ok(Completion::Saved(path))
    }

    async fn run_sequential<R: BufRead>(
        &self,
        source: JobSource<R>,
    ) -> Result<RunSummary, EngineError> {
        let tally = Tally::default();
        for item in source {
            match item? {
                SourceItem::Invalid(invalid) => {
                    emit(self.sink.as_ref(), &tally, Outcome::invalid_input(&invalid))
                }
                SourceItem::Job(job) => {
                    log_stage(&job, Stage::PendingValidation);
                    let outcome = self.process(&job).await;
                    emit(self.sink.as_ref(), &tally, outcome);
                }
            }
        }
        Ok(tally.summary())
    }

    async fn run_parallel<R>(
        &self,
        source: JobSource<R>,
        workers: usize,
        queue_capacity: usize,
    ) -> Result<RunSummary, EngineError>
    where
        R: BufRead + Send + 'static,
    {
        if workers == 0 || queue_capacity == 0 {
            return Err(EngineError::InvalidDispatch);
        }

        let (tx, rx) = mpsc::channel(queue_capacity);
        let queue: SharedQueue = Arc::new(Mutex::new(rx));
        let tally = Arc::new(Tally::default());

        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let collector = self.clone();
                let queue = Arc::clone(&queue);
                let tally = Arc::clone(&tally);
                tokio::spawn(async move { collector.work(worker_id, queue, &tally).await })
            })
            .collect();
        drop(queue);

        // The source is read with blocking IO; a full queue parks this thread.
        let sink = Arc::clone(&self.sink);
        let producer_tally = Arc::clone(&tally);
        let producer = tokio::task::spawn_blocking(move || {
            feed_queue(source, &tx, workers, sink.as_ref(), &producer_tally)
        });

        let fed = producer.await;
        for handle in handles {
            handle.await?;
        }
        fed??;
        Ok(tally.summary())
    }

    async fn work(&self, worker_id: usize, queue: SharedQueue, tally: &Tally) {
        collector_debug!("worker {} started", worker_id);
        loop {
            let message = { queue.lock().await.recv().await };
            match message {
                Some(WorkerMessage::Job(job)) => {
                    let outcome = self.process(&job).await;
                    emit(self.sink.as_ref(), tally, outcome);
                }
                Some(WorkerMessage::Terminate) | None => break,
            }
        }
        collector_debug!("worker {} finished", worker_id);
    }
}

/// Pushes every valid job into the bounded queue, reports invalid ones
/// directly, then sends one termination signal per worker.
fn feed_queue<R: BufRead>(
    source: JobSource<R>,
    tx: &mpsc::Sender<WorkerMessage>,
    workers: usize,
    sink: &dyn OutcomeSink,
    tally: &Tally,
) -> Result<(), SourceError> {
    let mut result = Ok(());
    for item in source {
        match item {
            Ok(SourceItem::Job(job)) => {
                log_stage(&job, Stage::PendingValidation);
                if tx.blocking_send(WorkerMessage::Job(job)).is_err() {
                    collector_error!("all workers exited early; stopping intake");
                    break;
                }
            }
            Ok(SourceItem::Invalid(invalid)) => emit(sink, tally, Outcome::invalid_input(&invalid)),
            Err(err) => {
                collector_error!("stopping intake: {}", err);
                result = Err(err);
                break;
            }
        }
    }
    for _ in 0..workers {
        if tx.blocking_send(WorkerMessage::Terminate).is_err() {
            break;
        }
    }
    result
}

fn log_stage(job: &Job, stage: Stage) {
    collector_debug!("item #{} {:?} {}", job.index, stage, job.url);
}
