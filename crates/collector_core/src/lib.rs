//! Collector core: pure job, validation and outcome types.
//!
//! Nothing in this crate touches the network. The only IO is the lazy reading
//! of the candidate list in [`JobSource`].
mod job;
mod limits;
mod mime;
mod outcome;
mod probe;
mod stage;
mod validate;

pub use job::{
    parse_candidate, InvalidJob, Job, JobIndex, JobSource, Separator, SeparatorError, SourceError,
    SourceItem,
};
pub use limits::{
    Dispatch, Limits, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES, DEFAULT_MAX_SIZE_MB,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS, MIB,
};
pub use mime::{extension_for, mime_essence, ALLOWED_IMAGE_TYPES};
pub use outcome::{Category, Completion, FailureKind, JobFailure, Outcome, OutcomeKind, Rejection};
pub use probe::{parse_http_date, ProbeResult};
pub use stage::Stage;
pub use validate::{validate, Accepted};
