//! Core library for holiday-countdown.
//!
//! Downloads per-year public holiday data, keeps the current and next year
//! cached on disk, and works out how many days remain until the next off-day.
//! Hosts plug in through `presentation::Reporter` and
//! `presentation::WidgetDisplay`.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod presentation;
pub mod refresh;

pub use api::{ApiClient, ApiError, HolidaySource};
pub use cache::{CacheError, CacheManager};
pub use config::Config;
pub use models::{HolidayRecord, NearestHoliday, RequiredYears};
pub use presentation::{ChannelReporter, IconKind, Reporter, WidgetDisplay, WidgetPresenter};
pub use refresh::{HolidayService, RefreshError, RefreshEvent, RefreshHandle, Refresher, RetryPolicy};
