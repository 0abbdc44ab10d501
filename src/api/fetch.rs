//! Narrow HTTP fetch abstraction.
//!
//! The Jira client talks to the network through the [`HttpFetcher`] trait so
//! report generation can be exercised in tests with canned responses. The
//! production implementation wraps `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use super::error::{ApiError, Result};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A raw HTTP response: status code plus body text.
///
/// Status interpretation is left to the caller; the muted-exception fetch
/// contract means a non-2xx JSON body is still a valid payload.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// The HTTP status code.
    pub status: u16,
    /// The response body text.
    pub body: String,
}

impl FetchedBody {
    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP surface the Jira client depends on.
#[async_trait]
pub trait HttpFetcher {
    /// Issue a GET request with the given Authorization header value.
    async fn get(&self, url: &str, auth_header: &str) -> Result<FetchedBody>;
}

/// Production fetcher backed by `reqwest`.
#[derive(Debug)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Build the fetcher with the default timeout.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, auth_header: &str) -> Result<FetchedBody> {
        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, auth_header)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(FetchedBody { status, body })
    }
}
