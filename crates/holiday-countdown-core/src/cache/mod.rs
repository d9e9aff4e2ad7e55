//! Local caching module for holiday data.
//!
//! This module provides the `CacheManager` for storing and reading one JSON
//! document per calendar year. A cached year is never refreshed; it is kept
//! while the year is required and deleted once it is not.

pub mod manager;

pub use manager::{year_from_file_name, CacheError, CacheManager};
