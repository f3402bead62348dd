//! Application state controller
//!
//! Owns the selected instant, the user's zone list and the reference zone.
//! Every mutation goes through here and is written through to the settings
//! store; a failed write is logged and otherwise ignored.

use chrono::{DateTime, Utc};

use crate::calendar::{short_date_label, MonthView};
use crate::config::{SettingsStore, SELECTED_INSTANT_RECORD, ZONE_LIST_RECORD};
use crate::error::{PersistenceError, ZoneResolutionError};
use crate::presenter::{present, CardScrub, CardView};
use crate::time_engine::{resolve_zone, TzDatabase};
use crate::time_mapper::{TimeMapper, TrackGeometry};
use crate::zone_list::{UserZoneList, ZoneEntry, ZoneListEditor};

/// Single owner of the widget's mutable state
#[derive(Debug)]
pub struct AppState {
    mapper: TimeMapper<TzDatabase>,
    store: SettingsStore,
    reference_zone: String,
    zones: UserZoneList,
    selected: DateTime<Utc>,
    track: TrackGeometry,
    scrub: CardScrub,
}

impl AppState {
    /// Restore state from `store`, falling back to defaults on bad data
    pub fn load(store: SettingsStore, reference_zone: impl Into<String>, now: DateTime<Utc>) -> Self {
        let reference_zone = reference_zone.into();

        let zones = match store.load_zone_list(now) {
            Ok(Some(zones)) => zones,
            Ok(None) => UserZoneList::starter(&reference_zone),
            Err(e) => {
                log_persistence_failure(&e);
                discard_malformed(&store, ZONE_LIST_RECORD, &e);
                UserZoneList::starter(&reference_zone)
            }
        };

        let selected = match store.load_selected_instant(now) {
            Ok(Some(instant)) => instant,
            Ok(None) => now,
            Err(e) => {
                log_persistence_failure(&e);
                discard_malformed(&store, SELECTED_INSTANT_RECORD, &e);
                now
            }
        };

        warn_unresolved(&zones);
        tracing::info!(
            reference = %reference_zone,
            zones = zones.len(),
            %selected,
            "state restored"
        );

        Self {
            mapper: TimeMapper::new(),
            store,
            reference_zone,
            zones,
            selected,
            track: TrackGeometry::for_viewport(0.0),
            scrub: CardScrub::default(),
        }
    }

    pub fn selected_instant(&self) -> DateTime<Utc> {
        self.selected
    }

    pub fn zones(&self) -> &UserZoneList {
        &self.zones
    }

    pub fn reference_zone(&self) -> &str {
        &self.reference_zone
    }

    pub fn track(&self) -> TrackGeometry {
        self.track
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub.active
    }

    /// Resize the scrub track to a new viewport width
    pub fn set_viewport_width(&mut self, width: f32) {
        self.track = TrackGeometry::for_viewport(width);
    }

    /// Replace the selected instant (date picker, "now" button)
    pub fn set_selected_instant(&mut self, instant: DateTime<Utc>) {
        if instant != self.selected {
            self.selected = instant;
            self.persist_instant();
        }
    }

    /// Pointer went down on a card at `x` pixels from the left edge
    pub fn begin_scrub(&mut self, x: f32) {
        let x = self.scrub.press(x);
        self.scrub_to_position(x);
    }

    /// Pointer moved; ignored unless a scrub is in progress
    pub fn scrub_moved(&mut self, x: f32) {
        if let Some(x) = self.scrub.moved(x) {
            self.scrub_to_position(x);
        }
    }

    pub fn end_scrub(&mut self) {
        self.scrub.release();
    }

    fn scrub_to_position(&mut self, x: f32) {
        match self
            .mapper
            .position_to_instant(&self.track, x, self.selected, &self.reference_zone)
        {
            Ok(instant) => self.set_selected_instant(instant),
            Err(e) => tracing::warn!(error = %e, "cannot scrub in reference zone"),
        }
    }

    /// Card views in display order; a bad zone fails only its own card
    ///
    /// Called every frame, so resolution failures are logged once
    /// when the list is loaded or committed instead of here.
    pub fn cards(&self) -> Vec<(&ZoneEntry, Result<CardView, ZoneResolutionError>)> {
        self.zones
            .iter()
            .map(|entry| {
                let view = present(&self.mapper, entry, self.selected, &self.reference_zone);
                (entry, view)
            })
            .collect()
    }

    /// Start editing a draft of the zone list
    pub fn open_editor(&self) -> ZoneListEditor {
        ZoneListEditor::open(&self.zones)
    }

    /// Publish an editing session's draft
    pub fn commit_editor(&mut self, editor: ZoneListEditor) {
        let zones = editor.commit();
        if zones != self.zones {
            warn_unresolved(&zones);
            self.zones = zones;
            self.persist_zones();
        }
    }

    /// Month the date picker should open on
    pub fn month_view(&self) -> MonthView {
        MonthView::for_instant(self.mapper.facility(), self.selected, &self.reference_zone)
            .unwrap_or_else(|_| MonthView::containing(self.selected.date_naive()))
    }

    pub fn is_day_selected(&self, view: &MonthView, day: u32) -> bool {
        view.is_selected(self.mapper.facility(), day, self.selected, &self.reference_zone)
    }

    /// Move the selected instant to `day` of `view`, keeping its time
    pub fn select_day(&mut self, view: &MonthView, day: u32) {
        match view.select_day(self.mapper.facility(), day, self.selected, &self.reference_zone) {
            Ok(Some(instant)) => self.set_selected_instant(instant),
            Ok(None) => tracing::debug!(day, "ignored day outside month"),
            Err(e) => tracing::warn!(error = %e, "cannot select day"),
        }
    }

    /// Header label such as "Oct 16"
    pub fn date_label(&self) -> String {
        short_date_label(self.mapper.facility(), self.selected, &self.reference_zone)
            .unwrap_or_else(|_| self.selected.format("%b %-d").to_string())
    }

    fn persist_zones(&self) {
        if let Err(e) = self.store.save_zone_list(&self.zones, Utc::now()) {
            log_persistence_failure(&e);
        }
    }

    fn persist_instant(&self) {
        if let Err(e) = self.store.save_selected_instant(self.selected, Utc::now()) {
            log_persistence_failure(&e);
        }
    }
}

/// Log every entry whose zone identifier the database does not know
fn warn_unresolved(zones: &UserZoneList) {
    for entry in zones {
        if let Err(e) = resolve_zone(&entry.zone_identifier) {
            tracing::warn!(id = %entry.id, error = %e, "zone card will not resolve");
        }
    }
}

fn log_persistence_failure(error: &PersistenceError) {
    if error.is_read() {
        tracing::warn!(error = %error, "stored settings unreadable; using defaults");
    } else if error.is_write() {
        tracing::warn!(error = %error, "failed to save settings; keeping in-memory state");
    } else {
        tracing::warn!(error = %error, "settings store unavailable");
    }
}

/// Drop a record that failed to parse so the next start begins clean
fn discard_malformed(store: &SettingsStore, record: &str, error: &PersistenceError) {
    if !matches!(error, PersistenceError::Parse { .. }) {
        return;
    }
    match store.delete_record(record) {
        Ok(()) => tracing::info!(record, "removed malformed record"),
        Err(e) => log_persistence_failure(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::zone_list_retention;
    use crate::directory::find_city;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn fresh(tmp: &TempDir) -> AppState {
        let mut state = AppState::load(SettingsStore::at(tmp.path()), "UTC", now());
        state.set_viewport_width(992.0); // 960 px track
        state
    }

    #[test]
    fn test_defaults_on_first_run() {
        let tmp = TempDir::new().unwrap();
        let state = fresh(&tmp);
        assert_eq!(state.selected_instant(), now());
        assert_eq!(state.zones(), &UserZoneList::starter("UTC"));
    }

    #[test]
    fn test_malformed_store_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::at(tmp.path());
        store
            .write_record(ZONE_LIST_RECORD, "[{\"id\":", zone_list_retention(), now())
            .unwrap();
        let path = store.record_path(ZONE_LIST_RECORD).unwrap();
        let state = AppState::load(store, "UTC", now());
        assert_eq!(state.zones().len(), 6);
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_writes_keep_in_memory_state() {
        // A regular file where the config directory should be
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "occupied").unwrap();

        let mut state = AppState::load(SettingsStore::at(blocker.clone()), "UTC", now());
        state.set_viewport_width(992.0);
        assert_eq!(state.zones(), &UserZoneList::starter("UTC"));

        state.begin_scrub(16.0 + 720.0);
        state.end_scrub();
        assert_eq!(
            state.selected_instant(),
            Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap()
        );

        let mut editor = state.open_editor();
        editor.remove("sydney");
        state.commit_editor(editor);
        assert_eq!(state.zones().len(), 5);
        assert!(!state.zones().contains("sydney"));
        assert!(blocker.is_file());
    }

    #[test]
    fn test_scrub_updates_and_persists() {
        let tmp = TempDir::new().unwrap();
        let mut state = fresh(&tmp);

        state.begin_scrub(16.0 + 480.0);
        assert!(state.is_scrubbing());
        assert_eq!(
            state.selected_instant(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );

        state.scrub_moved(16.0 + 720.0);
        assert_eq!(
            state.selected_instant(),
            Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap()
        );

        state.end_scrub();
        state.scrub_moved(16.0);
        assert_eq!(
            state.selected_instant(),
            Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap()
        );

        let reloaded = AppState::load(SettingsStore::at(tmp.path()), "UTC", now());
        assert_eq!(reloaded.selected_instant(), state.selected_instant());
    }

    #[test]
    fn test_commit_editor_persists_order() {
        let tmp = TempDir::new().unwrap();
        let mut state = fresh(&tmp);

        let mut editor = state.open_editor();
        editor.remove("current");
        editor.add_city(find_city("dubai").unwrap());
        editor.reorder(0, 1);
        state.commit_editor(editor);

        let ids: Vec<_> = state.zones().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ny", "sf", "london", "tokyo", "sydney", "dubai"]);

        let reloaded = AppState::load(SettingsStore::at(tmp.path()), "UTC", now());
        assert_eq!(reloaded.zones(), state.zones());
    }

    #[test]
    fn test_discarded_editor_changes_nothing() {
        let tmp = TempDir::new().unwrap();
        let state = fresh(&tmp);
        let before = state.zones().clone();
        let mut editor = state.open_editor();
        editor.remove("tokyo");
        editor.discard();
        assert_eq!(state.zones(), &before);
    }

    #[test]
    fn test_cards_isolate_bad_zone() {
        let tmp = TempDir::new().unwrap();
        let mut state = fresh(&tmp);
        let mut editor = state.open_editor();
        editor.add(ZoneEntry::new("moon", "Moon Base", "Moon/Tranquility", "🌕"));
        state.commit_editor(editor);

        let cards = state.cards();
        assert_eq!(cards.len(), 7);
        assert_eq!(cards.iter().filter(|(_, view)| view.is_err()).count(), 1);
        assert!(cards.last().map(|(_, view)| view.is_err()).unwrap_or(false));
    }

    #[test]
    fn test_select_day_and_label() {
        let tmp = TempDir::new().unwrap();
        let mut state = fresh(&tmp);
        let view = state.month_view().next();
        state.select_day(&view, 14);
        assert_eq!(
            state.selected_instant(),
            Utc.with_ymd_and_hms(2024, 2, 14, 12, 0, 0).unwrap()
        );
        assert_eq!(state.date_label(), "Feb 14");
        assert!(state.is_day_selected(&view, 14));
    }
}
