//! Collector engine: network probing, streaming persistence and job dispatch.
mod client;
mod dedup;
mod engine;
mod fetch;
mod path;
mod persist;
mod probe;
mod sink;
mod types;

pub use client::{build_client, RetryPolicy, USER_AGENT};
pub use dedup::should_skip;
pub use engine::Collector;
pub use fetch::{write_stream, Fetcher, ReqwestFetcher};
pub use path::{destination_path, url_digest};
pub use persist::{ensure_destination_dir, PendingFile, PersistError};
pub use probe::{Prober, ReqwestProber};
pub use sink::{OutcomeSink, RunSummary, StdoutSink};
pub use types::{EngineError, FetchError, ProbeError, TransportError};
