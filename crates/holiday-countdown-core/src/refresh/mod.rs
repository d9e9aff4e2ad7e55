//! Holiday data refresh.
//!
//! - `Refresher`: one pass of fetch-or-load, stale cleanup and nearest off-day scan
//! - `HolidayService`: single-flight background runner that reports outcomes
//! - `RetryPolicy`: when a failed refresh is retried

pub mod error;
pub mod retry;
pub mod routine;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use error::RefreshError;
pub use retry::RetryPolicy;
pub use routine::{Clock, Refresher};
pub use service::{HolidayService, RefreshEvent, RefreshHandle, RefreshOutcome};
