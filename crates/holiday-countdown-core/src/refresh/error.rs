use thiserror::Error;

use crate::api::ApiError;
use crate::cache::CacheError;

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Failed to download holiday data for {year}: {source}")]
    Fetch { year: i32, source: ApiError },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Refresh worker stopped unexpectedly: {0}")]
    Worker(String),
}

impl RefreshError {
    /// The year whose download failed, if this is a fetch failure.
    pub fn failed_year(&self) -> Option<i32> {
        match self {
            RefreshError::Fetch { year, .. } => Some(*year),
            _ => None,
        }
    }
}
