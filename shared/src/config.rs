//! Settings persistence
//!
//! Two named string records live in the config directory, each in its own
//! TOML file with an expiry stamp:
//! - `timeZones`: the user's zone list as JSON, kept for a year
//! - `selectedDate`: the selected instant as RFC 3339, kept for a week
//!
//! Expired records read as absent. Malformed ones surface as
//! [`PersistenceError::Parse`] so callers can fall back to defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::zone_list::UserZoneList;

pub const ZONE_LIST_RECORD: &str = "timeZones";
pub const SELECTED_INSTANT_RECORD: &str = "selectedDate";

/// Retention of the zone list record
pub fn zone_list_retention() -> Duration {
    Duration::days(365)
}

/// Retention of the selected-instant record
pub fn selected_instant_retention() -> Duration {
    Duration::days(7)
}

/// On-disk envelope around a record value
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Get the base configuration directory
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "zonebuddy", "zonebuddy").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Record store rooted at one directory
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: Option<PathBuf>,
}

impl SettingsStore {
    /// Store in the platform config directory
    ///
    /// When no home directory can be found every operation reports
    /// [`PersistenceError::NoConfigDir`].
    pub fn open_default() -> Self {
        Self { dir: config_dir() }
    }

    /// Store rooted at an explicit directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// File path backing record `name`
    pub fn record_path(&self, name: &str) -> Result<PathBuf, PersistenceError> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.toml", name)))
            .ok_or(PersistenceError::NoConfigDir)
    }

    /// Read record `name`; `None` if absent or expired at `now`
    pub fn read_record(
        &self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, PersistenceError> {
        let path = self.record_path(name)?;

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PersistenceError::Read { path, source }),
        };

        let record: StoredRecord =
            toml::from_str(&contents).map_err(|e| PersistenceError::Parse {
                record: name.to_string(),
                message: e.to_string(),
            })?;

        if record.expires_at <= now {
            tracing::debug!(record = name, "stored record expired");
            return Ok(None);
        }
        Ok(Some(record.value))
    }

    /// Write record `name`, expiring `retention` after `now`
    pub fn write_record(
        &self,
        name: &str,
        value: &str,
        retention: Duration,
        now: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let path = self.record_path(name)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let record = StoredRecord {
            value: value.to_string(),
            expires_at: now + retention,
        };
        let contents =
            toml::to_string_pretty(&record).map_err(|e| PersistenceError::Serialize {
                record: name.to_string(),
                message: e.to_string(),
            })?;
        fs::write(&path, contents).map_err(|source| PersistenceError::Write { path, source })
    }

    /// Delete record `name` if it exists
    pub fn delete_record(&self, name: &str) -> Result<(), PersistenceError> {
        let path = self.record_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Write { path, source }),
        }
    }

    pub fn load_zone_list(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<UserZoneList>, PersistenceError> {
        let Some(json) = self.read_record(ZONE_LIST_RECORD, now)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| PersistenceError::Parse {
                record: ZONE_LIST_RECORD.to_string(),
                message: e.to_string(),
            })
    }

    pub fn save_zone_list(
        &self,
        list: &UserZoneList,
        now: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(list).map_err(|e| PersistenceError::Serialize {
            record: ZONE_LIST_RECORD.to_string(),
            message: e.to_string(),
        })?;
        self.write_record(ZONE_LIST_RECORD, &json, zone_list_retention(), now)
    }

    pub fn load_selected_instant(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, PersistenceError> {
        let Some(text) = self.read_record(SELECTED_INSTANT_RECORD, now)? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| PersistenceError::Parse {
                record: SELECTED_INSTANT_RECORD.to_string(),
                message: e.to_string(),
            })
    }

    pub fn save_selected_instant(
        &self,
        instant: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        self.write_record(
            SELECTED_INSTANT_RECORD,
            &instant.to_rfc3339(),
            selected_instant_retention(),
            now,
        )
    }
}
