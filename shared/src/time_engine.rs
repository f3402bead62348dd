//! Time Engine - binding to the time-zone database
//!
//! Resolves IANA zone identifiers and decomposes instants into zone-local
//! calendar fields. chrono-tz carries the database and the DST rules; nothing
//! here reimplements them.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Datelike, LocalResult, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ZoneResolutionError;

/// Environment variable that pins the reference zone
pub const REFERENCE_ZONE_ENV: &str = "ZONEBUDDY_REFERENCE_ZONE";

/// Zone used when nothing better can be detected
pub const FALLBACK_ZONE: &str = "UTC";

/// AM/PM indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    AM,
    PM,
}

impl Period {
    pub fn from_hour(hour24: u32) -> Self {
        if hour24 < 12 {
            Period::AM
        } else {
            Period::PM
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::AM => write!(f, "AM"),
            Period::PM => write!(f, "PM"),
        }
    }
}

/// Zone-local calendar fields for one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalParts {
    /// Hour in 24-hour format (0-23); `None` when the facility dropped it
    pub hour: Option<u32>,
    /// Minute (0-59); `None` when the facility dropped it
    pub minute: Option<u32>,
    /// Day of month (1-31)
    pub day: u32,
    /// Month (1-12)
    pub month: u32,
    /// Year (e.g., 2025)
    pub year: i32,
    /// Short zone name (e.g., "PST", "JST", "+03")
    pub abbreviation: String,
}

/// Zone-aware wall-clock decomposition and composition
///
/// The app always talks to [`TzDatabase`]; the trait is the seam the
/// projection code is written against.
pub trait CalendarFacility {
    /// Decompose `instant` into the local fields of `zone`
    fn local_parts(
        &self,
        zone: &str,
        instant: DateTime<Utc>,
    ) -> Result<LocalParts, ZoneResolutionError>;

    /// Map a wall-clock time in `zone` back to an absolute instant
    ///
    /// Times skipped by a DST gap resolve forward to the first valid
    /// instant; repeated times resolve to the earlier one.
    fn to_instant(
        &self,
        zone: &str,
        local: NaiveDateTime,
    ) -> Result<DateTime<Utc>, ZoneResolutionError>;
}

/// [`CalendarFacility`] backed by the compiled-in IANA database
#[derive(Debug, Clone, Copy, Default)]
pub struct TzDatabase;

impl CalendarFacility for TzDatabase {
    fn local_parts(
        &self,
        zone: &str,
        instant: DateTime<Utc>,
    ) -> Result<LocalParts, ZoneResolutionError> {
        let tz = resolve_zone(zone)?;
        let local = instant.with_timezone(&tz);

        Ok(LocalParts {
            hour: Some(local.hour()),
            minute: Some(local.minute()),
            day: local.day(),
            month: local.month(),
            year: local.year(),
            abbreviation: local.format("%Z").to_string(),
        })
    }

    fn to_instant(
        &self,
        zone: &str,
        local: NaiveDateTime,
    ) -> Result<DateTime<Utc>, ZoneResolutionError> {
        let tz = resolve_zone(zone)?;
        Ok(localize(tz, local))
    }
}

/// Resolve an IANA identifier into a chrono-tz zone
pub fn resolve_zone(identifier: &str) -> Result<Tz, ZoneResolutionError> {
    identifier
        .parse::<Tz>()
        .map_err(|_| ZoneResolutionError::new(identifier))
}

fn localize(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => {
            // DST gaps are at most a few hours wide; step forward minute by minute
            let mut probe = local;
            for _ in 0..(4 * 60) {
                probe += chrono::Duration::minutes(1);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
            tracing::warn!(zone = tz.name(), %local, "no valid instant near local time");
            Utc.from_utc_datetime(&local)
        }
    }
}

/// Detect the device zone, used as the reference for day offsets
///
/// Order: explicit override, `TZ`, the `/etc/localtime` link target,
/// `/etc/timezone`, then UTC.
pub fn detect_reference_zone() -> String {
    let from_env = |name: &str| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim_start_matches(':').trim().to_string())
    };

    let candidates = [
        from_env(REFERENCE_ZONE_ENV),
        from_env("TZ"),
        zone_from_localtime_link(Path::new("/etc/localtime")),
        fs::read_to_string("/etc/timezone")
            .ok()
            .map(|s| s.trim().to_string()),
    ];

    for candidate in candidates.into_iter().flatten() {
        if resolve_zone(&candidate).is_ok() {
            return candidate;
        }
        tracing::debug!(candidate = %candidate, "ignoring unrecognised zone candidate");
    }

    FALLBACK_ZONE.to_string()
}

/// Extract "Area/City" from a symlink such as `/usr/share/zoneinfo/Area/City`
fn zone_from_localtime_link(link: &Path) -> Option<String> {
    let target = fs::read_link(link).ok()?;
    zone_from_zoneinfo_path(&target.to_string_lossy())
}

fn zone_from_zoneinfo_path(path: &str) -> Option<String> {
    path.split_once("zoneinfo/")
        .map(|(_, zone)| zone.to_string())
        .filter(|zone| !zone.is_empty())
}
