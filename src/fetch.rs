use std::time::Duration;

use anyhow::Context as _;
use reqwest::StatusCode;
use reqwest::header::{IF_MODIFIED_SINCE, LAST_MODIFIED, USER_AGENT};
use url::Url;

use crate::formats::RawFeed;

/// The feed's `Last-Modified` value, kept both in its original header form
/// (sent back as `If-Modified-Since` on the next run) and as epoch seconds
/// (stamped into the output document).
#[derive(Debug, Clone)]
pub struct FreshnessMarker {
    pub raw: String,
    pub epoch: i64,
}

impl FreshnessMarker {
    /// Parses an RFC-1123-style HTTP date, e.g. "Mon, 01 Jan 2024 00:00:00 GMT".
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let date = chrono::DateTime::parse_from_rfc2822(raw)
            .with_context(|| format!("parse Last-Modified date: {raw:?}"))?;
        Ok(Self {
            raw: raw.to_owned(),
            epoch: date.timestamp(),
        })
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// 200 with a decodable body and a usable `Last-Modified` header.
    NewData {
        feed: RawFeed,
        marker: FreshnessMarker,
    },
    /// Any non-200 status, 304 Not Modified included. Terminal for this run
    /// but not an error; the caller must stop without touching any file.
    Unchanged { status: StatusCode },
}

pub fn build_client(timeout_secs: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .context("build feed http client")
}

/// Downloads the feed, conditionally when a previous marker is supplied.
/// Persisting the new marker is the caller's responsibility.
pub async fn fetch(
    client: &reqwest::Client,
    url: &Url,
    previous_marker: Option<&str>,
) -> anyhow::Result<FetchOutcome> {
    let mut request = client
        .get(url.clone())
        .header(USER_AGENT, concat!("ffnodemap/", env!("CARGO_PKG_VERSION")));
    if let Some(previous) = previous_marker {
        request = request.header(IF_MODIFIED_SINCE, previous);
    }

    let response = request.send().await.with_context(|| format!("GET {url}"))?;

    let status = response.status();
    tracing::info!(%status, "feed response");
    if status != StatusCode::OK {
        return Ok(FetchOutcome::Unchanged { status });
    }

    let last_modified = response
        .headers()
        .get(LAST_MODIFIED)
        .ok_or_else(|| anyhow::anyhow!("feed response has no Last-Modified header"))?
        .to_str()
        .context("read Last-Modified header")?
        .to_owned();
    let marker = FreshnessMarker::parse(&last_modified)?;

    let feed = response
        .json::<RawFeed>()
        .await
        .context("decode feed body")?;

    Ok(FetchOutcome::NewData { feed, marker })
}
