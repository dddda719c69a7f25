//! Byte-range downloader for encrypted file content.
//!
//! Issues `Range: bytes=<start>-<end>` GETs and refuses to hand back a
//! buffer unless the response status, declared Content-Length, and the
//! byte count actually transferred all agree with the requested range.
//! No retries happen here; every failure carries enough context for the
//! orchestrator to decide whether the range is worth retrying.

use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::{Client, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid range: start {start} is past end {end}")]
    InvalidRange { start: u64, end: u64 },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status code: {code}")]
    UnexpectedStatus { code: u16 },
    #[error("missing Content-Length in response")]
    MissingContentLength,
    #[error("invalid Content-Length in response")]
    InvalidContentLength,
    #[error("requested range exceeds content length: requested {requested}, available {available}")]
    RangeExceedsContent { requested: u64, available: u64 },
    #[error("incomplete read: expected {expected} bytes, got {got}")]
    IncompleteRead { expected: usize, got: usize },
    #[error("read error: {0}")]
    Read(#[source] reqwest::Error),
}

/// Range downloader for one remote resource.
///
/// Wraps a `reqwest::Client` configured with per-request and connect
/// timeouts. The client is concurrency-safe, so one downloader may serve
/// any number of simultaneous range fetches; nothing is mutated after
/// construction. On timeout or cancellation the in-flight call fails with
/// [`DownloadError::Transport`] and no partial buffer escapes.
pub struct ChunkDownloader {
    url: String,
    client: Client,
}

impl ChunkDownloader {
    /// Create a downloader for `url` with the given request timeout.
    pub fn new(url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            url: url.to_string(),
            client,
        }
    }

    /// Fetch the byte range `[start, end]` of the resource.
    ///
    /// Returns exactly the declared Content-Length's worth of bytes. The
    /// response is validated in order: status must be 200 or 206, a
    /// positive Content-Length must be present, and the declared length
    /// must cover at least `end - start` bytes (a server that ignored the
    /// Range header and returned a shorter resource fails here rather
    /// than corrupting the reassembled file).
    pub async fn download_range(&self, start: u64, end: u64) -> Result<Vec<u8>, DownloadError> {
        if start > end {
            return Err(DownloadError::InvalidRange { start, end });
        }

        debug!("GET {} bytes={}-{}", self.url, start, end);
        let resp = self
            .client
            .get(&self.url)
            .header("Range", format!("bytes={}-{}", start, end))
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::PARTIAL_CONTENT {
            return Err(DownloadError::UnexpectedStatus {
                code: status.as_u16(),
            });
        }

        let length = content_length(resp.headers())?;
        if length < end - start {
            return Err(DownloadError::RangeExceedsContent {
                requested: end - start,
                available: length,
            });
        }

        read_body(resp, length as usize).await
    }
}

/// Extract and parse the declared Content-Length.
///
/// Absence and malformedness are distinct failures: a missing header means
/// the server gave us nothing to validate the transfer against, while a
/// non-positive or unparseable value means the response itself is broken.
pub(crate) fn content_length(headers: &HeaderMap) -> Result<u64, DownloadError> {
    let raw = headers
        .get(CONTENT_LENGTH)
        .ok_or(DownloadError::MissingContentLength)?;
    let length = raw
        .to_str()
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or(DownloadError::InvalidContentLength)?;
    if length == 0 {
        return Err(DownloadError::InvalidContentLength);
    }
    Ok(length)
}

/// Drain the response body into a buffer of exactly `expected` bytes.
///
/// End-of-stream before the buffer is full is reported as
/// [`DownloadError::IncompleteRead`]; any other stream failure aborts
/// immediately. Bytes past the declared length are discarded.
async fn read_body(
    mut resp: reqwest::Response,
    expected: usize,
) -> Result<Vec<u8>, DownloadError> {
    let mut data = Vec::with_capacity(expected);

    while data.len() < expected {
        match resp.chunk().await.map_err(DownloadError::Read)? {
            Some(bytes) => {
                let remaining = expected - data.len();
                data.extend_from_slice(&bytes[..bytes.len().min(remaining)]);
            }
            None => break,
        }
    }

    if data.len() != expected {
        warn!("short body: expected {} bytes, got {}", expected, data.len());
        return Err(DownloadError::IncompleteRead {
            expected,
            got: data.len(),
        });
    }

    Ok(data)
}
