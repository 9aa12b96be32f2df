use std::time::Duration;

use collector_core::{parse_http_date, Limits, ProbeResult};
use collector_logging::collector_debug;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use url::Url;

use crate::client::map_reqwest_error;
use crate::{ProbeError, RetryPolicy, TransportError};

/// Metadata-only lookup of a candidate URL.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &Url) -> Result<ProbeResult, ProbeError>;
}

/// HEAD-based prober that follows redirects itself with a per-job counter.
#[derive(Debug, Clone)]
pub struct ReqwestProber {
    client: reqwest::Client,
    retry: RetryPolicy,
    max_redirects: u32,
    attempt_timeout: Duration,
}

impl ReqwestProber {
    pub fn new(client: reqwest::Client, limits: &Limits) -> Self {
        Self {
            client,
            retry: RetryPolicy::from_limits(limits),
            max_redirects: limits.max_redirects,
            // Connect and read are each bounded by the request timeout.
            attempt_timeout: limits.request_timeout.saturating_mul(2),
        }
    }

    async fn head(&self, url: &Url) -> Result<reqwest::Response, TransportError> {
        self.client
            .head(url.clone())
            .timeout(self.attempt_timeout)
            .send()
            .await
            .map_err(|err| map_reqwest_error(&err))
    }
}

#[async_trait::async_trait]
impl Prober for ReqwestProber {
    async fn probe(&self, url: &Url) -> Result<ProbeResult, ProbeError> {
        let mut current = url.clone();
        let mut redirects = 0;
        loop {
            let response = self.retry.run("HEAD", &current, || self.head(&current)).await?;
            let status = response.status();

            if status.is_redirection() {
                if let Some(next) = redirect_target(&current, response.headers()) {
                    redirects += 1;
                    if redirects > self.max_redirects {
                        return Err(ProbeError::TooManyRedirects {
                            limit: self.max_redirects,
                        });
                    }
                    collector_debug!(
                        "HEAD {} -> {} ({}) redirect {}",
                        current,
                        next,
                        status,
                        redirects
                    );
                    current = next;
                    continue;
                }
            }

            return Ok(probe_result(current, redirects, status.as_u16(), response.headers()));
        }
    }
}

fn redirect_target(base: &Url, headers: &HeaderMap) -> Option<Url> {
    let location = headers.get(LOCATION)?.to_str().ok()?;
    base.join(location.trim()).ok()
}

fn probe_result(final_url: Url, redirects: u32, status: u16, headers: &HeaderMap) -> ProbeResult {
    // HEAD bodies are empty, so the declared length has to come from the header.
    let content_length = header_str(headers, CONTENT_LENGTH)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0);
    ProbeResult {
        status,
        content_length,
        content_type: header_str(headers, CONTENT_TYPE).map(str::to_string),
        last_modified: header_str(headers, LAST_MODIFIED).and_then(parse_http_date),
        final_url,
        redirects,
    }
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn relative_location_resolves_against_current_url() {
        let base = Url::parse("http://a.test/images/x.png").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static("../other/y.png"));
        assert_eq!(
            redirect_target(&base, &headers).unwrap().as_str(),
            "http://a.test/other/y.png"
        );
    }

    #[test]
    fn missing_or_garbage_length_counts_as_zero() {
        let url = Url::parse("http://a.test/x.png").unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(probe_result(url.clone(), 0, 200, &headers).content_length, 0);
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert_eq!(probe_result(url, 0, 200, &headers).content_length, 0);
    }

    #[test]
    fn unparsable_last_modified_is_absent() {
        let url = Url::parse("http://a.test/x.png").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(LAST_MODIFIED, HeaderValue::from_static("not a date"));
        assert_eq!(probe_result(url, 0, 200, &headers).last_modified, None);
    }
}
