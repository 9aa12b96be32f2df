use std::path::{Path, PathBuf};

use bytes::Bytes;
use collector_core::Limits;
use collector_logging::collector_debug;
use futures_util::{Stream, StreamExt};
use url::Url;

use crate::client::map_reqwest_error;
use crate::{FetchError, PendingFile, RetryPolicy};

/// Full transfer of an accepted resource to its destination.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, destination: &Path) -> Result<PathBuf, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
    max_bytes: u64,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client, limits: &Limits) -> Self {
        Self {
            client,
            retry: RetryPolicy::from_limits(limits),
            max_bytes: limits.max_size_bytes,
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url, destination: &Path) -> Result<PathBuf, FetchError> {
        // Only opening the transfer is retried; a body that breaks mid-stream is final.
        let response = self
            .retry
            .run("GET", url, || async {
                self.client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|err| map_reqwest_error(&err))
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        collector_debug!("GET {} streaming to {:?}", url, destination);
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|err| map_reqwest_error(&err)));
        write_stream(body, destination, self.max_bytes).await
    }
}

/// Streams `body` chunk by chunk into `destination`.
///
/// On any failure (stream error, oversize body, disk error) the partial data
/// is removed before the error is returned.
pub async fn write_stream<S, E>(
    body: S,
    destination: &Path,
    max_bytes: u64,
) -> Result<PathBuf, FetchError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<FetchError>,
{
    let mut pending = PendingFile::create(destination)?;
    match copy_chunks(body, &mut pending, max_bytes).await {
        Ok(written) => {
            let path = pending.commit()?;
            collector_debug!("wrote {} bytes to {:?}", written, path);
            Ok(path)
        }
        Err(err) => {
            pending.discard();
            Err(err)
        }
    }
}

async fn copy_chunks<S, E>(
    body: S,
    pending: &mut PendingFile,
    max_bytes: u64,
) -> Result<u64, FetchError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<FetchError>,
{
    let mut body = std::pin::pin!(body);
    let mut written: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Into::<FetchError>::into)?;
        written += chunk.len() as u64;
        if written > max_bytes {
            return Err(FetchError::TooLarge { max_bytes });
        }
        pending.write_chunk(&chunk)?;
    }
    Ok(written)
}
