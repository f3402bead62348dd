//! Time mapper - pointer position to wall-clock time, and per-zone projection
//!
//! Two directions:
//! - a horizontal position on the scrub track becomes an hour of day, which
//!   is written into the selected instant in the reference zone;
//! - an instant plus a zone becomes a [`ZoneProjection`]: local time, day
//!   offset against the reference zone, a daylight score and the palette
//!   picked from it.

use std::f64::consts::PI;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ZoneResolutionError;
use crate::time_engine::{CalendarFacility, LocalParts, Period, TzDatabase};

/// Inset on each side of the scrub track, in pixels
pub const DEFAULT_TRACK_MARGIN: f32 = 16.0;

/// Largest hour the track can produce; the right edge never wraps to 24:00
const LAST_HOUR: f64 = 24.0 - 1e-9;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Horizontal scrub track: `margin` pixels of inset, then `width` pixels of day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub margin: f32,
    pub width: f32,
}

impl TrackGeometry {
    pub fn new(margin: f32, width: f32) -> Self {
        Self { margin, width }
    }

    /// Track spanning a viewport with the default inset on both sides
    pub fn for_viewport(viewport_width: f32) -> Self {
        let margin = DEFAULT_TRACK_MARGIN;
        Self {
            margin,
            width: (viewport_width - 2.0 * margin).max(0.0),
        }
    }

    /// Fractional hour of day for position `x` (measured from the left edge)
    ///
    /// `h = 24 * clamp(x - margin, 0, W) / W`, held just below 24.
    pub fn position_to_hour(&self, x: f32) -> f64 {
        if self.width <= 0.0 {
            return 0.0;
        }
        let width = self.width as f64;
        let offset = (x as f64 - self.margin as f64).clamp(0.0, width);
        (24.0 * offset / width).min(LAST_HOUR)
    }

    /// Inverse of [`position_to_hour`](Self::position_to_hour) for drawing
    pub fn fraction_to_position(&self, fraction: f64) -> f32 {
        self.margin + (fraction.clamp(0.0, 1.0) as f32) * self.width
    }
}

/// Day/night band a card is painted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Day,
    Sunset,
    Dusk,
    Night,
}

impl Palette {
    pub fn from_brightness(brightness: f64) -> Self {
        if brightness > 0.7 {
            Palette::Day
        } else if brightness > 0.4 {
            Palette::Sunset
        } else if brightness > 0.3 {
            Palette::Dusk
        } else {
            Palette::Night
        }
    }

    /// Start and end colors of the card's diagonal gradient
    pub fn gradient(self) -> (Rgb, Rgb) {
        match self {
            Palette::Day => (Rgb::new(0xF2, 0xF2, 0xF9), Rgb::new(0xE8, 0xE8, 0xF5)),
            Palette::Sunset => (Rgb::new(0xFF, 0xD9, 0xB3), Rgb::new(0xFF, 0xBF, 0xD9)),
            Palette::Dusk => (Rgb::new(0x66, 0x77, 0x99), Rgb::new(0x99, 0x77, 0x99)),
            Palette::Night => (Rgb::new(0x26, 0x2A, 0x40), Rgb::new(0x33, 0x3A, 0x59)),
        }
    }
}

/// Foreground color for card text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn from_brightness(brightness: f64) -> Self {
        if brightness > 0.5 {
            TextColor::Black
        } else {
            TextColor::White
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            TextColor::Black => Rgb::new(0, 0, 0),
            TextColor::White => Rgb::new(0xFF, 0xFF, 0xFF),
        }
    }
}

/// Plain 8-bit RGB triple, independent of any drawing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// "#RRGGBB"
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// Daylight score in [0, 1]: 1 at local noon, 0 at local midnight
pub fn brightness(hour_decimal: f64) -> f64 {
    let normalized = hour_decimal / 24.0;
    (((normalized - 0.5) * 2.0 * PI).cos() + 1.0) / 2.0
}

/// Whole days between two calendar dates, via their UTC-midnight keys
pub fn day_offset(local: NaiveDate, reference: NaiveDate) -> i32 {
    let key = |date: NaiveDate| date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis());
    match (key(local), key(reference)) {
        (Some(a), Some(b)) => ((a - b) as f64 / MS_PER_DAY).round() as i32,
        _ => 0,
    }
}

/// Everything a card needs to know about one zone at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneProjection {
    /// Local hour (0-23)
    pub hour: u32,
    /// Local minute (0-59)
    pub minute: u32,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 12-hour clock text, e.g. "3:05"
    pub time_text: String,
    pub period: Period,
    /// Zone abbreviation, e.g. "PST"
    pub abbreviation: String,
    /// Calendar days ahead of (+) or behind (-) the reference zone
    pub day_offset: i32,
    pub brightness: f64,
    pub palette: Palette,
    pub text_color: TextColor,
    /// Position of the local time within the day, in [0, 1)
    pub day_fraction: f64,
}

/// Maps scrub positions to instants and instants to zone projections
#[derive(Debug, Clone, Default)]
pub struct TimeMapper<F = TzDatabase> {
    facility: F,
}

impl TimeMapper<TzDatabase> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: CalendarFacility> TimeMapper<F> {
    pub fn with_facility(facility: F) -> Self {
        Self { facility }
    }

    pub fn facility(&self) -> &F {
        &self.facility
    }

    /// Replace the wall-clock hour and minute of `instant` in `reference_zone`
    ///
    /// The calendar date in the reference zone is kept; seconds are zeroed.
    pub fn apply_hour(
        &self,
        instant: DateTime<Utc>,
        hour: f64,
        reference_zone: &str,
    ) -> Result<DateTime<Utc>, ZoneResolutionError> {
        let parts = self.facility.local_parts(reference_zone, instant)?;
        let Some(date) = NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day) else {
            tracing::warn!(
                zone = reference_zone,
                year = parts.year,
                month = parts.month,
                day = parts.day,
                "locale facility returned an invalid date"
            );
            return Ok(instant);
        };

        let hour = hour.clamp(0.0, LAST_HOUR);
        let whole_hour = hour.floor() as u32;
        let minute = ((hour.fract() * 60.0).floor() as u32).min(59);
        match date.and_hms_opt(whole_hour, minute, 0) {
            Some(local) => self.facility.to_instant(reference_zone, local),
            None => Ok(instant),
        }
    }

    /// Position on `track` straight to a new selected instant
    pub fn position_to_instant(
        &self,
        track: &TrackGeometry,
        x: f32,
        instant: DateTime<Utc>,
        reference_zone: &str,
    ) -> Result<DateTime<Utc>, ZoneResolutionError> {
        self.apply_hour(instant, track.position_to_hour(x), reference_zone)
    }

    /// Project `instant` into `zone`, comparing dates against `reference_zone`
    pub fn project(
        &self,
        zone: &str,
        instant: DateTime<Utc>,
        reference_zone: &str,
    ) -> Result<ZoneProjection, ZoneResolutionError> {
        let local = self.facility.local_parts(zone, instant)?;
        let reference = self.facility.local_parts(reference_zone, instant)?;

        let hour = required_part(local.hour, zone, "hour");
        let minute = required_part(local.minute, zone, "minute");
        let hour_decimal = hour as f64 + minute as f64 / 60.0;
        let score = brightness(hour_decimal);

        let hour12 = match hour {
            0 => 12,
            1..=12 => hour,
            _ => hour - 12,
        };

        Ok(ZoneProjection {
            hour,
            minute,
            year: local.year,
            month: local.month,
            day: local.day,
            time_text: format!("{}:{:02}", hour12, minute),
            period: Period::from_hour(hour),
            abbreviation: local.abbreviation.clone(),
            day_offset: date_offset(&local, &reference),
            brightness: score,
            palette: Palette::from_brightness(score),
            text_color: TextColor::from_brightness(score),
            day_fraction: hour_decimal / 24.0,
        })
    }
}

fn required_part(value: Option<u32>, zone: &str, field: &'static str) -> u32 {
    value.unwrap_or_else(|| {
        tracing::warn!(zone, field, "locale facility omitted a time field; using 0");
        0
    })
}

fn date_offset(local: &LocalParts, reference: &LocalParts) -> i32 {
    let local_date = NaiveDate::from_ymd_opt(local.year, local.month, local.day);
    let reference_date = NaiveDate::from_ymd_opt(reference.year, reference.month, reference.day);
    match (local_date, reference_date) {
        (Some(a), Some(b)) => day_offset(a, b),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone, Timelike};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    /// Facility that loses the time fields, as a broken locale layer would
    struct FieldlessFacility;

    impl CalendarFacility for FieldlessFacility {
        fn local_parts(
            &self,
            zone: &str,
            instant: DateTime<Utc>,
        ) -> Result<LocalParts, ZoneResolutionError> {
            let mut parts = TzDatabase.local_parts(zone, instant)?;
            parts.hour = None;
            parts.minute = None;
            Ok(parts)
        }

        fn to_instant(
            &self,
            zone: &str,
            local: NaiveDateTime,
        ) -> Result<DateTime<Utc>, ZoneResolutionError> {
            TzDatabase.to_instant(zone, local)
        }
    }

    #[test]
    fn test_position_to_hour_endpoints() {
        let track = TrackGeometry::new(16.0, 960.0);
        assert_eq!(track.position_to_hour(16.0), 0.0);
        assert_eq!(track.position_to_hour(496.0), 12.0);
        let end = track.position_to_hour(976.0);
        assert!(end < 24.0 && end > 23.99);
    }

    #[test]
    fn test_position_to_hour_clamps_outside_track() {
        let track = TrackGeometry::new(16.0, 960.0);
        assert_eq!(track.position_to_hour(-50.0), 0.0);
        assert_eq!(track.position_to_hour(2000.0), track.position_to_hour(976.0));
    }

    #[test]
    fn test_position_to_hour_monotonic() {
        let track = TrackGeometry::for_viewport(800.0);
        let mut previous = -1.0;
        let mut x = track.margin;
        while x <= track.margin + track.width {
            let hour = track.position_to_hour(x);
            assert!(hour >= previous);
            assert!((0.0..24.0).contains(&hour));
            assert_eq!(hour, track.position_to_hour(x));
            previous = hour;
            x += 0.5;
        }
    }

    #[test]
    fn test_degenerate_track() {
        let track = TrackGeometry::for_viewport(10.0);
        assert_eq!(track.width, 0.0);
        assert_eq!(track.position_to_hour(100.0), 0.0);
    }

    #[test]
    fn test_fraction_to_position() {
        let track = TrackGeometry::new(16.0, 960.0);
        assert_eq!(track.fraction_to_position(0.5), 496.0);
        assert_eq!(track.fraction_to_position(2.0), 976.0);
    }

    #[test]
    fn test_brightness_extremes() {
        assert!((brightness(12.0) - 1.0).abs() < 1e-12);
        assert!(brightness(0.0).abs() < 1e-12);
        for step in 0..(24 * 4) {
            let b = brightness(step as f64 / 4.0);
            assert!((0.0..=1.0).contains(&b));
        }
    }

    #[test]
    fn test_palette_bands() {
        assert_eq!(Palette::from_brightness(0.75), Palette::Day);
        assert_eq!(Palette::from_brightness(0.7), Palette::Sunset);
        assert_eq!(Palette::from_brightness(0.5), Palette::Sunset);
        assert_eq!(Palette::from_brightness(0.35), Palette::Dusk);
        assert_eq!(Palette::from_brightness(0.3), Palette::Night);
        assert_eq!(Palette::from_brightness(0.05), Palette::Night);
    }

    #[test]
    fn test_text_color() {
        assert_eq!(TextColor::from_brightness(0.6), TextColor::Black);
        assert_eq!(TextColor::from_brightness(0.2), TextColor::White);
        assert_eq!(TextColor::from_brightness(0.5), TextColor::White);
    }

    #[test]
    fn test_gradient_hex() {
        let (start, end) = Palette::Night.gradient();
        assert_eq!(start.hex(), "#262A40");
        assert_eq!(end.hex(), "#333A59");
    }

    #[test]
    fn test_day_offset_tokyo_ahead_of_utc() {
        let mapper = TimeMapper::new();
        let projection = mapper
            .project("Asia/Tokyo", utc(2024, 1, 1, 23, 30), "UTC")
            .unwrap();
        assert_eq!((projection.hour, projection.minute), (8, 30));
        assert_eq!(projection.day, 2);
        assert_eq!(projection.day_offset, 1);
        assert_eq!(projection.time_text, "8:30");
        assert_eq!(projection.period, Period::AM);
    }

    #[test]
    fn test_day_offset_behind_and_same() {
        let mapper = TimeMapper::new();
        let instant = utc(2024, 1, 2, 3, 0);
        let la = mapper.project("America/Los_Angeles", instant, "UTC").unwrap();
        assert_eq!(la.day_offset, -1);
        let london = mapper.project("Europe/London", instant, "UTC").unwrap();
        assert_eq!(london.day_offset, 0);
    }

    #[test]
    fn test_day_offset_across_month_end() {
        let a = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(day_offset(a, b), 1);
        assert_eq!(day_offset(b, a), -1);
    }

    #[test]
    fn test_projection_noon_is_day() {
        let mapper = TimeMapper::new();
        let projection = mapper
            .project("Asia/Tokyo", utc(2024, 6, 1, 3, 0), "Asia/Tokyo")
            .unwrap();
        assert_eq!(projection.hour, 12);
        assert_eq!(projection.time_text, "12:00");
        assert_eq!(projection.period, Period::PM);
        assert_eq!(projection.palette, Palette::Day);
        assert_eq!(projection.text_color, TextColor::Black);
        assert_eq!(projection.day_fraction, 0.5);
    }

    #[test]
    fn test_projection_unknown_zone() {
        let mapper = TimeMapper::new();
        let err = mapper
            .project("Nowhere/Special", utc(2024, 1, 1, 0, 0), "UTC")
            .unwrap_err();
        assert_eq!(err.identifier, "Nowhere/Special");

        let err = mapper
            .project("UTC", utc(2024, 1, 1, 0, 0), "Bad/Reference")
            .unwrap_err();
        assert_eq!(err.identifier, "Bad/Reference");
    }

    #[test]
    fn test_missing_fields_default_to_midnight() {
        let mapper = TimeMapper::with_facility(FieldlessFacility);
        let projection = mapper
            .project("Asia/Tokyo", utc(2024, 6, 1, 3, 0), "UTC")
            .unwrap();
        assert_eq!((projection.hour, projection.minute), (0, 0));
        assert_eq!(projection.palette, Palette::Night);
    }

    #[test]
    fn test_apply_hour_in_reference_zone() {
        let mapper = TimeMapper::new();
        let instant = utc(2024, 1, 15, 20, 47);
        // 15:30 in New York (EST, UTC-5) on Jan 15
        let updated = mapper.apply_hour(instant, 15.5, "America/New_York").unwrap();
        assert_eq!(updated, utc(2024, 1, 15, 20, 30));
        assert_eq!(updated.second(), 0);
    }

    #[test]
    fn test_apply_hour_keeps_reference_date() {
        let mapper = TimeMapper::new();
        // 2024-01-02 01:00 UTC is still Jan 1 in Los Angeles
        let instant = utc(2024, 1, 2, 1, 0);
        let updated = mapper.apply_hour(instant, 9.0, "America/Los_Angeles").unwrap();
        assert_eq!(updated, utc(2024, 1, 1, 17, 0));
    }

    #[test]
    fn test_position_to_instant_idempotent() {
        let mapper = TimeMapper::new();
        let track = TrackGeometry::new(16.0, 960.0);
        let instant = utc(2024, 5, 5, 10, 10);
        let once = mapper.position_to_instant(&track, 700.0, instant, "UTC").unwrap();
        let twice = mapper.position_to_instant(&track, 700.0, once, "UTC").unwrap();
        assert_eq!(once, twice);
        // 684 px of 960 → 17.1h → 17:06
        assert_eq!(once, utc(2024, 5, 5, 17, 6));
    }

    #[test]
    fn test_right_edge_stays_on_same_day() {
        let mapper = TimeMapper::new();
        let track = TrackGeometry::new(16.0, 960.0);
        let instant = utc(2024, 5, 5, 10, 10);
        let updated = mapper.position_to_instant(&track, 976.0, instant, "UTC").unwrap();
        assert_eq!(updated, utc(2024, 5, 5, 23, 59));
    }
}
