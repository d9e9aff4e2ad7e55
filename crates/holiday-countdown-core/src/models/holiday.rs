//! Holiday records and the nearest off-day computation.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One calendar entry from a year's `days` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "isOffDay")]
    pub is_off_day: bool,
}

impl HolidayRecord {
    /// Local midnight at the start of this record's date.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }
}

/// The readable part of a cached year document.
///
/// The document itself is stored untouched; only `days` is interpreted.
/// Entries that don't parse as a `HolidayRecord` are dropped and counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearPayload {
    pub days: Vec<HolidayRecord>,
    pub skipped: usize,
}

impl YearPayload {
    pub fn from_value(value: &Value) -> Self {
        let Some(entries) = value.get("days").and_then(Value::as_array) else {
            warn!("Holiday document has no days array");
            return Self::default();
        };

        let mut payload = Self::default();
        for entry in entries {
            match serde_json::from_value::<HolidayRecord>(entry.clone()) {
                Ok(record) => payload.days.push(record),
                Err(e) => {
                    warn!(error = %e, entry = %entry, "Skipping malformed holiday entry");
                    payload.skipped += 1;
                }
            }
        }
        payload
    }
}

/// The years kept in the cache: the current one and the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredYears {
    current: i32,
}

impl RequiredYears {
    pub fn for_date(now: NaiveDateTime) -> Self {
        Self { current: now.year() }
    }

    /// Years in fetch order.
    pub fn years(&self) -> [i32; 2] {
        [self.current, self.current + 1]
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years().contains(&year)
    }
}

/// The soonest upcoming off-day and how many whole days remain until it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearestHoliday {
    pub name: String,
    pub date: NaiveDate,
    pub days_left: i64,
}

/// Find the off-day closest to `now` that has not started yet.
///
/// Records dated before `now` never qualify. `days_left` counts whole days
/// from `now` to the record's midnight, rounded down. On equal `days_left`
/// the earlier record in `records` wins.
pub fn find_nearest(records: &[HolidayRecord], now: NaiveDateTime) -> Option<NearestHoliday> {
    let mut nearest: Option<NearestHoliday> = None;

    for record in records {
        let starts_at = record.starts_at();
        if starts_at < now || !record.is_off_day {
            continue;
        }

        let days_left = (starts_at - now).num_days();
        let closer = nearest
            .as_ref()
            .map_or(true, |current| days_left < current.days_left);
        if closer {
            nearest = Some(NearestHoliday {
                name: record.name.clone(),
                date: record.date,
                days_left,
            });
        }
    }

    nearest
}

// ============================================================================
// Tests
// ============================================================================
