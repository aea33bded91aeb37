use std::time::Duration;

use board_logging::{board_debug, board_trace};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{EngineEvent, FailureKind, FetchError, JobId, JobRecord};

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Source of job identifiers and job details.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Ordered identifiers of the current job postings.
    async fn fetch_job_ids(&self) -> Result<Vec<JobId>, FetchError>;

    async fn fetch_job(&self, job_id: JobId) -> Result<JobRecord, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let base = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        board_trace!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{status} for {url}"),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        board_trace!("{} answered {} bytes", url, bytes.len());

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, format!("{url}: {err}")))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_job_ids(&self) -> Result<Vec<JobId>, FetchError> {
        let url = self.endpoint("jobstories.json")?;
        let ids: Vec<JobId> = self.get_json(url).await?;
        board_debug!("Listing returned {} job ids", ids.len());
        Ok(ids)
    }

    async fn fetch_job(&self, job_id: JobId) -> Result<JobRecord, FetchError> {
        let url = self.endpoint(&format!("item/{job_id}.json"))?;
        // Deleted or unknown items come back as a literal `null`.
        let record: Option<JobRecord> = self.get_json(url).await?;
        record.ok_or_else(|| FetchError::new(FailureKind::Missing, format!("job {job_id}")))
    }
}

/// Joining relative endpoints needs a trailing slash on the base.
fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {other}"),
        )),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = parse_base_url("http://localhost:8080/v0").unwrap();
        assert_eq!(
            url.join("jobstories.json").unwrap().as_str(),
            "http://localhost:8080/v0/jobstories.json"
        );
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        let err = parse_base_url("ftp://example.com/").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
        let err = parse_base_url("not a url").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn item_endpoint_is_relative_to_base() {
        let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
        let url = fetcher.endpoint("item/42.json").unwrap();
        assert_eq!(
            url.as_str(),
            "https://hacker-news.firebaseio.com/v0/item/42.json"
        );
    }
}
