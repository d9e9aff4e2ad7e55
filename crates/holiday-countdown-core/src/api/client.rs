//! HTTP client for the holiday-cn JSON mirror.
//!
//! This module provides the `ApiClient` struct, which downloads one year of
//! holiday data per request and hands back the parsed JSON body untouched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{ApiError, HolidaySource};

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the holiday-cn mirror. Year files live at `<base>/<year>.json`.
pub const HOLIDAY_API_BASE_URL: &str = "https://fastly.jsdelivr.net/gh/NateScarlet/holiday-cn@master";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The CDN mirror serves browser clients; requests carry a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// API client for the holiday mirror.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client pointed at the public mirror
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: HOLIDAY_API_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different mirror, sharing the connection pool.
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: base_url.into(),
        }
    }

    pub fn year_url(&self, year: i32) -> String {
        format!("{}/{}.json", self.base_url.trim_end_matches('/'), year)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Download the raw JSON document for one calendar year.
    ///
    /// The body must parse as JSON; its shape is not checked here; the cache
    /// layer tolerates documents without a usable `days` array.
    pub async fn fetch_year_payload(&self, year: i32) -> Result<Value, ApiError> {
        let url = self.year_url(year);
        debug!(url = %url, year, "Requesting holiday data");

        let response = self.client.get(&url).send().await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let payload: Value = serde_json::from_str(&text)?;
        Ok(payload)
    }
}

#[async_trait]
impl HolidaySource for ApiClient {
    async fn fetch_year(&self, year: i32) -> Result<Value, ApiError> {
        self.fetch_year_payload(year).await
    }
}

// ============================================================================
// Tests
// ============================================================================
