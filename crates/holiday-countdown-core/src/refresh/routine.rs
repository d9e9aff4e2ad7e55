//! The refresh routine: make sure the required years are cached, drop the
//! years that are no longer needed, and find the nearest off-day.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, error, info};

use crate::api::HolidaySource;
use crate::cache::CacheManager;
use crate::models::{find_nearest, NearestHoliday, RequiredYears};

use super::RefreshError;

/// Source of the current local date-time.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Runs one refresh against a cache directory and a holiday source.
pub struct Refresher {
    source: Arc<dyn HolidaySource>,
    cache: CacheManager,
    clock: Clock,
}

impl Refresher {
    pub fn new(source: Arc<dyn HolidaySource>, cache: CacheManager) -> Self {
        Self {
            source,
            cache,
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }

    /// Replace the wall clock that `run` reads.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Refresh against the configured clock (local wall time by default).
    pub async fn run(&self) -> Result<Option<NearestHoliday>, RefreshError> {
        self.run_at((self.clock)()).await
    }

    /// Refresh as if the current local time were `now`.
    ///
    /// Steps run in order: fetch-or-load each required year, delete stale
    /// years, then scan. A failed download returns before the cleanup step.
    /// The cache directory is recreated first if something removed it.
    pub async fn run_at(&self, now: NaiveDateTime) -> Result<Option<NearestHoliday>, RefreshError> {
        self.cache.ensure_dir()?;
        let required = RequiredYears::for_date(now);
        debug!(years = ?required.years(), "Refreshing holiday data");

        let mut records = Vec::new();
        for year in required.years() {
            if self.cache.has_year(year) {
                debug!(year, "Holiday data already cached");
            } else {
                self.fetch_and_cache(year).await?;
            }
            records.extend(self.cache.load_days(year));
        }

        self.cache.remove_stale(&required)?;

        let nearest = find_nearest(&records, now);
        match &nearest {
            Some(holiday) => info!(
                name = %holiday.name,
                date = %holiday.date,
                days_left = holiday.days_left,
                "Nearest off-day found"
            ),
            None => info!(records = records.len(), "No upcoming off-day in cached data"),
        }
        Ok(nearest)
    }

    async fn fetch_and_cache(&self, year: i32) -> Result<(), RefreshError> {
        let payload = self.source.fetch_year(year).await.map_err(|source| {
            error!(year, error = %source, "Failed to download holiday data");
            RefreshError::Fetch { year, source }
        })?;

        self.cache.store_year(year, &payload)?;
        info!(year, "Downloaded and cached holiday data");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
