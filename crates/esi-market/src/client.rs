//! ESI HTTP client and paginated fetcher.
//!
//! ESI communicates pagination through the `x-pages` response header: page 1
//! reveals the total page count, remaining pages go through a bounded worker
//! pool and are concatenated in page order. Transient upstream errors are
//! retried with exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use esi_common::Fetched;

/// Default ESI base URL (latest compatibility tier).
const DEFAULT_BASE_URL: &str = "https://esi.evetech.net/latest";

/// Default `datasource` query parameter (main server cluster).
const DEFAULT_DATASOURCE: &str = "tranquility";

/// Response header carrying the total page count.
const PAGES_HEADER: &str = "x-pages";

/// HTTP status codes treated as transient (retryable). 420 is the ESI
/// error-limit response.
const RETRYABLE_STATUS_CODES: &[u16] = &[420, 502, 503, 504];

/// Errors surfaced by the ESI client.
#[derive(Debug, Error)]
pub enum EsiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ESI returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid x-pages header: {0}")]
    PageHeader(String),

    #[error("failed to decode ESI response: {0}")]
    Json(String),
}

/// Configuration for the ESI client.
#[derive(Debug, Clone)]
pub struct EsiConfig {
    /// Base URL of the ESI API.
    pub base_url: String,
    /// `datasource` query parameter appended to every request.
    pub datasource: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Cap on concurrently fetched pages, independent of the page count.
    pub max_concurrent_pages: usize,
    /// Retry attempts for transient failures.
    pub max_retries: u32,
    /// Initial retry backoff (doubles with each attempt).
    pub initial_backoff: Duration,
}

impl Default for EsiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            datasource: DEFAULT_DATASOURCE.to_string(),
            request_timeout: Duration::from_secs(30),
            max_concurrent_pages: 8,
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

/// Client for the EVE ESI market endpoints.
#[derive(Debug, Clone)]
pub struct EsiClient {
    http: Client,
    config: EsiConfig,
}

impl EsiClient {
    /// Create a client from a config.
    pub fn new(config: EsiConfig) -> Self {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { http, config }
    }

    /// Create a client with the default production config.
    pub fn with_defaults() -> Self {
        Self::new(EsiConfig::default())
    }

    pub fn config(&self) -> &EsiConfig {
        &self.config
    }

    /// Build an endpoint URL with the datasource and extra query pairs.
    pub(crate) fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/{}/?datasource={}",
            self.config.base_url, path, self.config.datasource
        );
        for (key, value) in query {
            url.push_str(&format!("&{key}={value}"));
        }
        url
    }

    /// GET with bounded retry on transient failures.
    async fn get_with_retry(&self, url: &str, token: Option<&str>) -> Result<Response, EsiError> {
        let mut attempt = 0;
        let mut backoff = self.config.initial_backoff;

        loop {
            let mut request = self.http.get(url);
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            let result = request.send().await;
            let transient = match &result {
                Ok(response) => RETRYABLE_STATUS_CODES.contains(&response.status().as_u16()),
                Err(_) => true,
            };

            if transient && attempt < self.config.max_retries {
                attempt += 1;
                warn!(
                    attempt,
                    max_attempts = self.config.max_retries + 1,
                    backoff_ms = backoff.as_millis() as u64,
                    url,
                    "Transient ESI failure, backing off"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                continue;
            }

            return result.map_err(EsiError::Http);
        }
    }

    /// Fetch one page, returning its records and the advertised page count.
    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        page: u32,
        token: Option<&str>,
    ) -> Result<(Vec<T>, u32), EsiError> {
        let page_url = format!("{url}&page={page}");
        debug!(url = %page_url, "Fetching ESI page");

        let response = self.get_with_retry(&page_url, token).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EsiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let pages = page_count(response.headers())?;
        let records = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| EsiError::Json(e.to_string()))?;
        Ok((records, pages))
    }

    /// Fetch every page of a paged endpoint and concatenate the records.
    ///
    /// Page 1 is fetched first to learn the page count; the rest go through
    /// a semaphore capped at `max_concurrent_pages`. `join_all` yields
    /// results in spawn order, so the concatenation is deterministic
    /// regardless of the cap. Any page failing after retries fails the
    /// whole fetch.
    pub(crate) async fn get_paginated<T: DeserializeOwned>(
        &self,
        url: String,
        token: Option<String>,
    ) -> Result<Fetched<T>, EsiError> {
        let (first, pages) = self.get_page::<T>(&url, 1, token.as_deref()).await?;
        if pages <= 1 {
            return Ok(Fetched::from_records(first));
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_pages));
        let fetches: Vec<_> = (2..=pages)
            .map(|page| {
                let semaphore = Arc::clone(&semaphore);
                let url = url.clone();
                let token = token.clone();
                async move {
                    let _permit = semaphore.acquire().await.unwrap();
                    self.get_page::<T>(&url, page, token.as_deref())
                        .await
                        .map(|(records, _)| records)
                }
            })
            .collect();

        let mut rest = Vec::with_capacity(pages as usize - 1);
        for result in join_all(fetches).await {
            rest.push(result?);
        }

        let merged = merge_pages(first, rest);
        debug!(pages, records = merged.len(), "Merged paginated fetch");
        Ok(Fetched::from_records(merged))
    }
}

/// Concatenate pages in page order, preserving per-page record order.
///
/// The merge depends only on the page sequence, never on fetch timing, so
/// the result is identical whatever the concurrency cap was.
fn merge_pages<T>(first: Vec<T>, rest: Vec<Vec<T>>) -> Vec<T> {
    let mut merged = first;
    for page in rest {
        merged.extend(page);
    }
    merged
}

/// Parse the `x-pages` header, defaulting to a single page when absent.
fn page_count(headers: &HeaderMap) -> Result<u32, EsiError> {
    match headers.get(PAGES_HEADER) {
        None => Ok(1),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|&pages| pages >= 1)
            .ok_or_else(|| EsiError::PageHeader(format!("{value:?}"))),
    }
}
