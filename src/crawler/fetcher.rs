//! Fetch capability and its HTTP implementation
//!
//! The crawler only needs one operation from a fetcher: turn an identifier
//! into page content plus the identifiers it links to. This module defines
//! that capability and an implementation backed by real HTTP requests:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with status and Content-Type checks
//! - Error classification into [`FetchError`]

use crate::config::UserAgentConfig;
use crate::crawler::parser::parse_html;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Content of a fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// Page content
    pub body: String,

    /// Identifiers discovered on the page, in page order
    pub links: Vec<String>,
}

impl FetchedPage {
    pub fn new<I, S>(body: impl Into<String>, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            body: body.into(),
            links: links.into_iter().map(Into::into).collect(),
        }
    }
}

/// The fetch capability the crawler is driven by
///
/// Each call is independent; the crawler makes no assumption of idempotence,
/// and calls the fetcher at most once per identifier per crawl.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the page named by `id`
    async fn fetch(&self, id: &str) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::UserAgentConfig;
/// use ripple_crawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "RippleCrawl".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher that treats identifiers as URLs and requests them over HTTP
///
/// The reported content is the page `<title>` (the final URL when the page
/// has none); the discovered identifiers are the page's absolute links.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::from_client(build_http_client(config, timeout)?))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// # Error Mapping
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Identifier is not a URL | `Other` |
    /// | HTTP 404 | `NotFound` |
    /// | Other non-2xx | `Status` |
    /// | Content-Type not HTML | `ContentMismatch` |
    /// | Timeout, connect or body errors | `Network` |
    async fn fetch(&self, id: &str) -> Result<FetchedPage, FetchError> {
        let url = Url::parse(id).map_err(|e| FetchError::Other(format!("invalid URL {}: {}", id, e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(id, &e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: id.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(FetchError::ContentMismatch {
                url: id.to_string(),
                content_type,
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| classify_error(id, &e))?;

        let parsed = parse_html(&body, &final_url);
        tracing::trace!("{} links on {}", parsed.links.len(), final_url);

        Ok(FetchedPage {
            body: parsed.title.unwrap_or_else(|| final_url.to_string()),
            links: parsed.links,
        })
    }
}

fn classify_error(url: &str, error: &reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection refused".to_string()
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}
