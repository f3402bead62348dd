//! Month grid behind the date picker
//!
//! Weeks start on Sunday. Picking a day changes only the calendar date of
//! the selected instant; its wall-clock time in the reference zone is kept.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::error::ZoneResolutionError;
use crate::time_engine::CalendarFacility;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The month currently shown by the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    first: NaiveDate,
}

impl MonthView {
    /// View of the month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// View of the month the selected instant falls in, in `reference_zone`
    pub fn for_instant<F: CalendarFacility>(
        facility: &F,
        instant: DateTime<Utc>,
        reference_zone: &str,
    ) -> Result<Self, ZoneResolutionError> {
        let parts = facility.local_parts(reference_zone, instant)?;
        let date = NaiveDate::from_ymd_opt(parts.year, parts.month, 1)
            .unwrap_or_else(|| instant.date_naive());
        Ok(Self::containing(date))
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn previous(&self) -> Self {
        Self {
            first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next().first;
        if next == self.first {
            return 31;
        }
        (next - self.first).num_days() as u32
    }

    /// Grid cells: blanks before the first weekday, then 1..=days_in_month
    pub fn slots(&self) -> Vec<Option<u32>> {
        let lead = self.first.weekday().num_days_from_sunday() as usize;
        std::iter::repeat(None)
            .take(lead)
            .chain((1..=self.days_in_month()).map(Some))
            .collect()
    }

    /// "October 2026"
    pub fn title(&self) -> String {
        format!(
            "{} {}",
            MONTH_NAMES[self.first.month0() as usize],
            self.first.year()
        )
    }

    /// Whether `day` of this view is the selected instant's date
    pub fn is_selected<F: CalendarFacility>(
        &self,
        facility: &F,
        day: u32,
        instant: DateTime<Utc>,
        reference_zone: &str,
    ) -> bool {
        facility
            .local_parts(reference_zone, instant)
            .map(|p| p.year == self.year() && p.month == self.month() && p.day == day)
            .unwrap_or(false)
    }

    /// Selected instant moved to `day` of this view, keeping its local time
    ///
    /// `Ok(None)` when the day does not exist in this month.
    pub fn select_day<F: CalendarFacility>(
        &self,
        facility: &F,
        day: u32,
        instant: DateTime<Utc>,
        reference_zone: &str,
    ) -> Result<Option<DateTime<Utc>>, ZoneResolutionError> {
        let Some(date) = NaiveDate::from_ymd_opt(self.year(), self.month(), day) else {
            return Ok(None);
        };
        let parts = facility.local_parts(reference_zone, instant)?;
        let local = date.and_hms_opt(parts.hour.unwrap_or(0), parts.minute.unwrap_or(0), 0);
        match local {
            Some(local) => facility.to_instant(reference_zone, local).map(Some),
            None => Ok(None),
        }
    }
}

/// Short header label for the selected date, e.g. "Oct 16"
pub fn short_date_label<F: CalendarFacility>(
    facility: &F,
    instant: DateTime<Utc>,
    reference_zone: &str,
) -> Result<String, ZoneResolutionError> {
    let parts = facility.local_parts(reference_zone, instant)?;
    let month = MONTH_NAMES
        .get(parts.month.saturating_sub(1) as usize)
        .map(|name| &name[..3])
        .unwrap_or("???");
    Ok(format!("{} {}", month, parts.day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_engine::TzDatabase;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_slots_october_2026() {
        // 2026-10-01 is a Thursday
        let view = MonthView::containing(date(2026, 10, 16));
        let slots = view.slots();
        assert_eq!(slots.len(), 4 + 31);
        assert!(slots[..4].iter().all(Option::is_none));
        assert_eq!(slots[4], Some(1));
        assert_eq!(slots.last(), Some(&Some(31)));
    }

    #[test]
    fn test_leap_february() {
        assert_eq!(MonthView::containing(date(2024, 2, 10)).days_in_month(), 29);
        assert_eq!(MonthView::containing(date(2023, 2, 10)).days_in_month(), 28);
    }

    #[test]
    fn test_navigation_rolls_years() {
        let december = MonthView::containing(date(2025, 12, 5));
        let january = december.next();
        assert_eq!((january.year(), january.month()), (2026, 1));
        assert_eq!(january.previous(), december);
        assert_eq!(january.title(), "January 2026");
    }

    #[test]
    fn test_select_day_keeps_local_time() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 20, 30, 0).unwrap();
        let view = MonthView::containing(date(2024, 7, 1));
        let moved = view
            .select_day(&TzDatabase, 4, instant, "America/New_York")
            .unwrap()
            .unwrap();
        // 15:30 EST in January stays 15:30 local, now EDT
        assert_eq!(moved, Utc.with_ymd_and_hms(2024, 7, 4, 19, 30, 0).unwrap());
    }

    #[test]
    fn test_select_missing_day() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let view = MonthView::containing(date(2023, 2, 1));
        assert_eq!(view.select_day(&TzDatabase, 30, instant, "UTC").unwrap(), None);
    }

    #[test]
    fn test_is_selected_uses_reference_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        let view = MonthView::for_instant(&TzDatabase, instant, "Asia/Tokyo").unwrap();
        assert!(view.is_selected(&TzDatabase, 2, instant, "Asia/Tokyo"));
        assert!(!view.is_selected(&TzDatabase, 1, instant, "Asia/Tokyo"));
    }

    #[test]
    fn test_short_date_label() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        assert_eq!(short_date_label(&TzDatabase, instant, "UTC").unwrap(), "Oct 16");
    }
}
