use std::future::Future;
use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Status(u16),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(e.to_string()),
        }
    }
}

/// Source of the raw feed page.
pub trait FeedFetcher {
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>>;
}

/// GETs the feed once with the caller's session cookies. No retries.
pub struct HttpFetcher {
    client: reqwest::Client,
    feed_url: Url,
}

impl HttpFetcher {
    pub fn new(feed_url: &str, cookie: Option<&str>) -> Result<Self, FetchError> {
        let feed_url = Url::parse(feed_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", feed_url, e)))?;

        let jar = Jar::default();
        if let Some(cookie) = cookie {
            for pair in cookie_pairs(cookie) {
                jar.add_cookie_str(pair, &feed_url);
            }
        }

        let client = reqwest::Client::builder()
            .cookie_provider(Arc::new(jar))
            .build()?;

        Ok(Self { client, feed_url })
    }
}

impl FeedFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        info!("Fetching feed: {}", self.feed_url);
        let response = self.client.get(self.feed_url.clone()).send().await.map_err(|e| {
            warn!("Feed request failed: {}", e);
            FetchError::from(e)
        })?;

        check_status(response.status())?;
        let html = response.text().await?;
        info!("Fetched {} bytes", html.len());
        Ok(html)
    }
}

fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    warn!("Feed responded with {}", status);
    Err(FetchError::Status(status.as_u16()))
}

/// Split a `Cookie:` header style string into individual `name=value` pairs.
fn cookie_pairs(header: &str) -> impl Iterator<Item = &str> {
    header
        .split(';')
        .map(str::trim)
        .filter(|pair| pair.contains('=') && !pair.starts_with('='))
}
