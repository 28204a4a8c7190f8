use std::time::Duration;

use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};

use crate::{Error, Result};

/// Default timeout for full-content GET requests.
pub const DEFAULT_GET_TIMEOUT: Duration = Duration::from_secs(30);
/// Default timeout for HEAD revalidation requests.
pub const DEFAULT_HEAD_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for documentation corpora with `ETag` revalidation support
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    head_timeout: Duration,
}

/// Body and validator returned by a successful GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    /// Response body.
    pub content: String,
    /// `ETag` response header, if sent.
    pub etag: Option<String>,
}

/// Outcome of a conditional HEAD request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revalidation {
    /// Server answered 304; the cached copy is current.
    NotModified {
        /// Validator echoed by the server, if any.
        etag: Option<String>,
    },
    /// Server answered 2xx; the resource may have changed.
    Modified {
        /// Current validator, if the server sent one.
        etag: Option<String>,
    },
}

impl Revalidation {
    /// The validator the server reported, if any.
    pub fn etag(&self) -> Option<&str> {
        match self {
            Self::NotModified { etag } | Self::Modified { etag } => etag.as_deref(),
        }
    }
}

impl Fetcher {
    /// Creates a fetcher with the default timeouts
    pub fn new() -> Result<Self> {
        Self::with_timeouts(DEFAULT_GET_TIMEOUT, DEFAULT_HEAD_TIMEOUT)
    }

    /// Creates a fetcher with custom GET and HEAD timeouts
    pub fn with_timeouts(get_timeout: Duration, head_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(get_timeout)
            .user_agent(concat!("ax/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            head_timeout,
        })
    }

    /// GET the full body of `url`.
    pub async fn fetch(&self, url: &str) -> Result<FetchedContent> {
        let response = self.client.get(url).send().await?;
        let response = ensure_success(url, response)?;

        let etag = etag_header(&response);
        let content = response.text().await?;
        info!("Fetched {} bytes from {}", content.len(), url);

        Ok(FetchedContent { content, etag })
    }

    /// HEAD `url`, sending `If-None-Match` when a validator is known.
    pub async fn revalidate(&self, url: &str, etag: Option<&str>) -> Result<Revalidation> {
        let mut request = self.client.head(url).timeout(self.head_timeout);
        if let Some(tag) = etag {
            debug!("Setting If-None-Match: {}", tag);
            request = request.header(IF_NONE_MATCH, tag);
        }

        let response = request.send().await?;
        if response.status() == StatusCode::NOT_MODIFIED {
            debug!("Resource not modified (304) for {}", url);
            return Ok(Revalidation::NotModified {
                etag: etag_header(&response).or_else(|| etag.map(str::to_string)),
            });
        }

        let response = ensure_success(url, response)?;
        Ok(Revalidation::Modified {
            etag: etag_header(&response),
        })
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

fn etag_header(response: &Response) -> Option<String> {
    response
        .headers()
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}
