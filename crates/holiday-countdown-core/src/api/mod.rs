//! HTTP client module for the holiday data mirror.
//!
//! This module provides the `ApiClient` for downloading per-year holiday
//! documents, and the `HolidaySource` trait the refresh routine fetches
//! through so that other sources can stand in for the mirror.

pub mod client;
pub mod error;

use async_trait::async_trait;
use serde_json::Value;

pub use client::{ApiClient, HOLIDAY_API_BASE_URL};
pub use error::ApiError;

/// Something that can produce the raw holiday document for a year.
#[async_trait]
pub trait HolidaySource: Send + Sync {
    /// Fetch the JSON document for `year`. Any error aborts the refresh.
    async fn fetch_year(&self, year: i32) -> Result<Value, ApiError>;
}
