use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{HolidayRecord, RequiredYears, YearPayload};

/// Cache file names are `holidays_<year>.json`.
const CACHE_FILE_PREFIX: &str = "holidays_";

static CACHE_FILE_PATTERN: OnceLock<Regex> = OnceLock::new();
static TEMP_FILE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn cache_file_pattern() -> &'static Regex {
    CACHE_FILE_PATTERN.get_or_init(|| {
        Regex::new(r"^holidays_(\d{4})\.json$").expect("cache file pattern is a valid regex")
    })
}

/// Leftovers of a `store_year` that died between write and rename.
fn temp_file_pattern() -> &'static Regex {
    TEMP_FILE_PATTERN.get_or_init(|| {
        Regex::new(r"^holidays_\d{4}\.json\.tmp$").expect("temp file pattern is a valid regex")
    })
}

/// Parse the year out of a cache file name, if it is one.
pub fn year_from_file_name(file_name: &str) -> Option<i32> {
    cache_file_pattern()
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to create cache directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to list cache directory {}: {source}", .path.display())]
    List { path: PathBuf, source: io::Error },

    #[error("Failed to read cache file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse cache file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write cache file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to serialize holiday data for {year}: {source}")]
    Serialize {
        year: i32,
        source: serde_json::Error,
    },
}

/// Per-year holiday documents stored as flat JSON files in one directory.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self, CacheError> {
        let cache = Self { cache_dir };
        cache.ensure_dir()?;
        Ok(cache)
    }

    /// Create the cache directory if it is missing. Safe to call on every refresh.
    pub fn ensure_dir(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).map_err(|source| CacheError::CreateDir {
            path: self.cache_dir.clone(),
            source,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn year_path(&self, year: i32) -> PathBuf {
        self.cache_dir.join(format!("{}{}.json", CACHE_FILE_PREFIX, year))
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.year_path(year).exists()
    }

    /// Persist a year's document as indented UTF-8 JSON.
    ///
    /// The file is written next to its final name and renamed into place, so
    /// an interrupted write never leaves a truncated `holidays_<year>.json`.
    pub fn store_year(&self, year: i32, payload: &Value) -> Result<(), CacheError> {
        let path = self.year_path(year);
        let contents = serde_json::to_string_pretty(payload)
            .map_err(|source| CacheError::Serialize { year, source })?;

        let temp_path = path.with_extension("json.tmp");
        if let Err(source) = fs::write(&temp_path, contents) {
            Self::discard_temp_file(&temp_path);
            return Err(CacheError::Write { path, source });
        }
        if let Err(source) = fs::rename(&temp_path, &path) {
            Self::discard_temp_file(&temp_path);
            return Err(CacheError::Write { path, source });
        }

        debug!(year, path = %path.display(), "Stored holiday data");
        Ok(())
    }

    fn discard_temp_file(temp_path: &Path) {
        if let Err(e) = fs::remove_file(temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %temp_path.display(), error = %e, "Failed to remove temp cache file");
            }
        }
    }

    /// Read and interpret a cached year. Errors if the file is unreadable or not JSON.
    pub fn load_year(&self, year: i32) -> Result<YearPayload, CacheError> {
        let path = self.year_path(year);
        let contents = fs::read_to_string(&path).map_err(|source| CacheError::Read {
            path: path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&contents).map_err(|source| CacheError::Parse { path, source })?;
        Ok(YearPayload::from_value(&value))
    }

    /// Load a year's records, treating an unreadable or corrupt file as empty.
    pub fn load_days(&self, year: i32) -> Vec<HolidayRecord> {
        match self.load_year(year) {
            Ok(payload) => {
                debug!(year, records = payload.days.len(), skipped = payload.skipped, "Loaded cached holidays");
                payload.days
            }
            Err(e) => {
                error!(year, error = %e, "Failed to read holiday cache, treating as empty");
                Vec::new()
            }
        }
    }

    /// Years that currently have a cache file, sorted ascending.
    pub fn cached_years(&self) -> Result<Vec<i32>, CacheError> {
        let mut years: Vec<i32> = self
            .cache_file_names()?
            .iter()
            .filter_map(|name| year_from_file_name(name))
            .collect();
        years.sort_unstable();
        Ok(years)
    }

    /// Delete cache files for every year outside `required`, plus any
    /// orphaned `holidays_<year>.json.tmp` left by an interrupted store.
    ///
    /// A file that can't be removed is logged and skipped. Returns the years
    /// whose files were removed.
    pub fn remove_stale(&self, required: &RequiredYears) -> Result<Vec<i32>, CacheError> {
        let mut removed = Vec::new();

        for file_name in self.cache_file_names()? {
            if temp_file_pattern().is_match(&file_name) {
                let path = self.cache_dir.join(&file_name);
                match fs::remove_file(&path) {
                    Ok(()) => info!(file = %file_name, "Removed orphaned temp cache file"),
                    Err(e) => warn!(file = %file_name, error = %e, "Failed to remove temp cache file"),
                }
                continue;
            }
            let Some(year) = year_from_file_name(&file_name) else {
                continue;
            };
            if required.contains(year) {
                continue;
            }

            let path = self.cache_dir.join(&file_name);
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!(file = %file_name, year, "Removed stale holiday cache");
                    removed.push(year);
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Failed to remove stale holiday cache");
                }
            }
        }

        Ok(removed)
    }

    fn cache_file_names(&self) -> Result<Vec<String>, CacheError> {
        let list_error = |source| CacheError::List {
            path: self.cache_dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.cache_dir).map_err(list_error)? {
            let entry = entry.map_err(list_error)?;
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }
}

// ============================================================================
// Tests
// ============================================================================
