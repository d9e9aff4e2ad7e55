//! Data models for holiday data.
//!
//! - `HolidayRecord`: one entry of a year's `days` array
//! - `YearPayload`: the interpreted part of a cached year document
//! - `RequiredYears`: the years the cache must cover
//! - `NearestHoliday`: the countdown result

pub mod holiday;

pub use holiday::{find_nearest, HolidayRecord, NearestHoliday, RequiredYears, YearPayload};
