use std::future::Future;

use collector_core::Limits;
use collector_logging::collector_warn;
use url::Url;

use crate::{EngineError, TransportError};

pub const USER_AGENT: &str = concat!("image-collector/", env!("CARGO_PKG_VERSION"));

/// Builds the client shared by the prober and the fetcher.
///
/// Redirects are never followed automatically; the prober counts them itself.
pub fn build_client(limits: &Limits) -> Result<reqwest::Client, EngineError> {
    reqwest::Client::builder()
        .connect_timeout(limits.request_timeout)
        .read_timeout(limits.request_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(USER_AGENT)
        .build()
        .map_err(EngineError::Client)
}

pub(crate) fn map_reqwest_error(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection
    }
}

/// Re-runs a request on transport failures until the attempt budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
}

impl RetryPolicy {
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    pub fn from_limits(limits: &Limits) -> Self {
        Self::new(limits.attempts())
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub async fn run<T, F, Fut>(
        &self,
        method: &str,
        url: &Url,
        mut request: F,
    ) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt = 1;
        loop {
            match request().await {
                Err(err) if attempt < self.attempts => {
                    collector_warn!(
                        "{} {} attempt {}/{} failed: {}; retrying",
                        method,
                        url,
                        attempt,
                        self.attempts,
                        err
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn url() -> Url {
        Url::parse("http://a.test/x.png").unwrap()
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = RetryPolicy::new(3)
            .run("HEAD", &url(), || async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(TransportError::Connection)
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::new(2)
            .run("GET", &url(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TransportError::Timeout)
            })
            .await;
        assert_eq!(result, Err(TransportError::Timeout));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        assert_eq!(RetryPolicy::new(0).attempts(), 1);
    }
}
