/// Position of a job in its pipeline. Steps run strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PendingValidation,
    ProbeInFlight,
    DedupCheck,
    DownloadInFlight,
    Done,
}
