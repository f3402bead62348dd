//! Zone card presenter
//!
//! Pure projection from (entry, selected instant, reference zone) to the
//! strings and colors a card draws, plus the pointer bookkeeping that turns
//! a drag on any card into live scrubbing of the shared instant.

use chrono::{DateTime, Utc};

use crate::error::ZoneResolutionError;
use crate::time_engine::{CalendarFacility, Period};
use crate::time_mapper::{Palette, Rgb, TimeMapper};
use crate::zone_list::ZoneEntry;

/// Display-ready state of one zone card
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub title: String,
    /// "LABEL · ABBR", or just the abbreviation when unlabelled
    pub subtitle: String,
    pub glyph: String,
    pub time_text: String,
    pub period: Period,
    /// "+1d" / "-1d"; absent on the reference date
    pub day_badge: Option<String>,
    pub palette: Palette,
    pub gradient: (Rgb, Rgb),
    pub text_color: Rgb,
    /// Where the card's time indicator sits, in [0, 1)
    pub indicator_fraction: f64,
}

/// Project one entry at `instant`
pub fn present<F: CalendarFacility>(
    mapper: &TimeMapper<F>,
    entry: &ZoneEntry,
    instant: DateTime<Utc>,
    reference_zone: &str,
) -> Result<CardView, ZoneResolutionError> {
    let projection = mapper.project(&entry.zone_identifier, instant, reference_zone)?;

    let subtitle = match entry.label.as_deref() {
        Some(label) if !label.is_empty() => format!("{} · {}", label, projection.abbreviation),
        _ => projection.abbreviation.clone(),
    };

    Ok(CardView {
        title: entry.display_name.clone(),
        subtitle,
        glyph: entry.glyph.clone(),
        time_text: projection.time_text,
        period: projection.period,
        day_badge: format_day_badge(projection.day_offset),
        palette: projection.palette,
        gradient: projection.palette.gradient(),
        text_color: projection.text_color.rgb(),
        indicator_fraction: projection.day_fraction,
    })
}

/// "+2d", "-1d", or nothing for the same day
pub fn format_day_badge(day_offset: i32) -> Option<String> {
    match day_offset {
        0 => None,
        d if d > 0 => Some(format!("+{}d", d)),
        d => Some(format!("{}d", d)),
    }
}

/// Pointer capture on a card while scrubbing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardScrub {
    pub active: bool,
    pub last_pointer_x: f32,
}

impl CardScrub {
    /// Capture the pointer; the press position is scrubbed to immediately
    pub fn press(&mut self, x: f32) -> f32 {
        self.active = true;
        self.last_pointer_x = x;
        x
    }

    /// Position to forward to the time mapper, only while captured
    pub fn moved(&mut self, x: f32) -> Option<f32> {
        if !self.active {
            return None;
        }
        self.last_pointer_x = x;
        Some(x)
    }

    pub fn release(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::find_city;
    use crate::time_mapper::TextColor;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_present_tokyo_card() {
        let mapper = TimeMapper::new();
        let entry = find_city("tokyo").unwrap().to_entry().with_label("FRIENDS");
        let card = present(&mapper, &entry, utc(2024, 1, 1, 23, 30), "UTC").unwrap();

        assert_eq!(card.title, "Tokyo");
        assert_eq!(card.subtitle, "FRIENDS · JST");
        assert_eq!(card.time_text, "8:30");
        assert_eq!(card.period, Period::AM);
        assert_eq!(card.day_badge.as_deref(), Some("+1d"));
        assert_eq!(card.glyph, "🗼");
    }

    #[test]
    fn test_present_night_card() {
        let mapper = TimeMapper::new();
        let entry = find_city("london").unwrap().to_entry();
        let card = present(&mapper, &entry, utc(2024, 1, 10, 1, 0), "Europe/London").unwrap();

        assert_eq!(card.subtitle, "GMT");
        assert_eq!(card.day_badge, None);
        assert_eq!(card.palette, Palette::Night);
        assert_eq!(card.gradient, Palette::Night.gradient());
        assert_eq!(card.text_color, TextColor::White.rgb());
    }

    #[test]
    fn test_present_unknown_zone_fails_only_that_card() {
        let mapper = TimeMapper::new();
        let broken = ZoneEntry::new("x", "Nowhere", "Not/AZone", "?");
        let fine = find_city("paris").unwrap().to_entry();
        let instant = utc(2024, 1, 1, 12, 0);

        assert!(present(&mapper, &broken, instant, "UTC").is_err());
        assert!(present(&mapper, &fine, instant, "UTC").is_ok());
    }

    #[test]
    fn test_format_day_badge() {
        assert_eq!(format_day_badge(0), None);
        assert_eq!(format_day_badge(1).as_deref(), Some("+1d"));
        assert_eq!(format_day_badge(-1).as_deref(), Some("-1d"));
    }

    #[test]
    fn test_scrub_forwards_only_while_captured() {
        let mut scrub = CardScrub::default();
        assert_eq!(scrub.moved(40.0), None);
        assert_eq!(scrub.press(50.0), 50.0);
        assert_eq!(scrub.moved(60.0), Some(60.0));
        assert_eq!(scrub.last_pointer_x, 60.0);
        scrub.release();
        assert_eq!(scrub.moved(70.0), None);
        assert!(!scrub.active);
    }
}
