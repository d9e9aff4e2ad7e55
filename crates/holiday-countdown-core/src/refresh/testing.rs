//! Test doubles shared by the refresh tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::{ApiError, HolidaySource};

/// A year document in the mirror's shape.
pub(crate) fn payload_for(year: i32) -> Value {
    json!({
        "$schema": "https://raw.githubusercontent.com/NateScarlet/holiday-cn/master/schema.json",
        "$id": format!("https://raw.githubusercontent.com/NateScarlet/holiday-cn/master/{}.json", year),
        "year": year,
        "papers": [],
        "days": [
            {"name": "元旦", "date": format!("{}-01-01", year), "isOffDay": true},
            {"name": "国庆节", "date": format!("{}-10-01", year), "isOffDay": true},
            {"name": "国庆节", "date": format!("{}-10-11", year), "isOffDay": false}
        ]
    })
}

/// In-memory holiday source that records every request.
#[derive(Default)]
pub(crate) struct FakeSource {
    failing: Mutex<HashSet<i32>>,
    calls: Mutex<Vec<i32>>,
    delay: Option<Duration>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every request takes `delay` before answering.
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub(crate) fn fail_year(&self, year: i32) {
        self.failing.lock().unwrap().insert(year);
    }

    pub(crate) fn recover_year(&self, year: i32) {
        self.failing.lock().unwrap().remove(&year);
    }

    pub(crate) fn calls(&self) -> Vec<i32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HolidaySource for FakeSource {
    async fn fetch_year(&self, year: i32) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(year);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&year) {
            return Err(ApiError::ServerError("boom".to_string()));
        }
        Ok(payload_for(year))
    }
}
