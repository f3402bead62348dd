//! User zone list, its draft editor, and the drag-to-reorder gesture
//!
//! The authoritative [`UserZoneList`] is only ever replaced wholesale by
//! [`ZoneListEditor::commit`]. Edits, including a reorder in flight, live on
//! the editor's draft until then.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::directory::{find_city, search_cities, City};

/// Press-and-hold time before a reorder drag starts
pub const ACTIVATION_DELAY: Duration = Duration::from_millis(220);

/// Pointer travel allowed during the hold, in pixels
pub const ACTIVATION_TOLERANCE: f32 = 6.0;

/// One city on the user's list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneEntry {
    pub id: String,
    pub display_name: String,
    pub zone_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub glyph: String,
}

impl ZoneEntry {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        zone_identifier: impl Into<String>,
        glyph: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            zone_identifier: zone_identifier.into(),
            label: None,
            glyph: glyph.into(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.is_empty() { None } else { Some(label) };
        self
    }
}

/// Ordered list of entries, unique by id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ZoneEntry>", into = "Vec<ZoneEntry>")]
pub struct UserZoneList {
    entries: Vec<ZoneEntry>,
}

impl UserZoneList {
    /// Build a list, keeping the first of any entries sharing an id
    pub fn from_entries(entries: impl IntoIterator<Item = ZoneEntry>) -> Self {
        let mut list = Self::default();
        for entry in entries {
            if !list.contains(&entry.id) {
                list.entries.push(entry);
            }
        }
        list
    }

    /// First-run list: the device zone, then a handful of labelled cities
    pub fn starter(reference_zone: &str) -> Self {
        let mut entries = vec![ZoneEntry::new(
            "current",
            "Your Location",
            reference_zone,
            "📍",
        )];
        let labelled = [
            ("sf", "HOME"),
            ("ny", "WORK"),
            ("london", "TEAM"),
            ("tokyo", "FRIENDS"),
            ("sydney", "FAMILY"),
        ];
        entries.extend(
            labelled
                .iter()
                .filter_map(|(id, label)| find_city(id).map(|city| city.to_entry().with_label(*label))),
        );
        Self::from_entries(entries)
    }

    pub fn entries(&self) -> &[ZoneEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ZoneEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}

impl From<Vec<ZoneEntry>> for UserZoneList {
    fn from(entries: Vec<ZoneEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<UserZoneList> for Vec<ZoneEntry> {
    fn from(list: UserZoneList) -> Self {
        list.entries
    }
}

impl<'a> IntoIterator for &'a UserZoneList {
    type Item = &'a ZoneEntry;
    type IntoIter = std::slice::Iter<'a, ZoneEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Editing session over a draft copy of the user's list
#[derive(Debug, Clone)]
pub struct ZoneListEditor {
    draft: UserZoneList,
}

impl ZoneListEditor {
    /// Start a session from the current authoritative list
    pub fn open(list: &UserZoneList) -> Self {
        Self {
            draft: list.clone(),
        }
    }

    pub fn draft(&self) -> &UserZoneList {
        &self.draft
    }

    pub fn contains(&self, id: &str) -> bool {
        self.draft.contains(id)
    }

    /// Append `entry` with its label cleared; adding a present id is a no-op
    pub fn add(&mut self, entry: ZoneEntry) -> bool {
        if self.draft.contains(&entry.id) {
            return false;
        }
        self.draft.entries.push(ZoneEntry {
            label: None,
            ..entry
        });
        true
    }

    /// Convenience for adding straight from the directory
    pub fn add_city(&mut self, city: &City) -> bool {
        self.add(city.to_entry())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        match self.draft.position(id) {
            Some(index) => {
                self.draft.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Move the entry at `from` so it ends up at `to`
    ///
    /// Out-of-range indices leave the draft untouched and return `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.draft.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let entry = self.draft.entries.remove(from);
            self.draft.entries.insert(to, entry);
            tracing::debug!(from, to, "reordered zone draft");
        }
        true
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        index > 0 && self.reorder(index, index - 1)
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        index
            .checked_add(1)
            .is_some_and(|to| self.reorder(index, to))
    }

    /// Directory cities matching `query`; never touches the draft
    pub fn filter(&self, query: &str) -> impl Iterator<Item = &'static City> {
        search_cities(query)
    }

    /// Publish the draft as the new authoritative list
    pub fn commit(self) -> UserZoneList {
        tracing::info!(zones = self.draft.len(), "committed zone list");
        self.draft
    }

    /// Abandon every edit made in this session
    pub fn discard(self) {
        tracing::debug!("discarded zone list edits");
    }
}

/// A completed drag, ready to hand to [`ZoneListEditor::reorder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderMove {
    pub from: usize,
    pub to: usize,
}

/// Drag-to-reorder state machine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReorderGesture {
    #[default]
    Idle,
    /// Pointer is down on a row but the hold has not activated yet
    Pending {
        index: usize,
        origin: (f32, f32),
        pressed_at: Duration,
    },
    /// Row `from` is being carried over row `over`
    Dragging { from: usize, over: usize },
    /// Press turned into a tap or scroll; ignores input until released
    Aborted,
}

impl ReorderGesture {
    pub fn is_dragging(&self) -> bool {
        matches!(self, ReorderGesture::Dragging { .. })
    }

    /// Index of the row being carried, if any
    pub fn dragged_index(&self) -> Option<usize> {
        match self {
            ReorderGesture::Dragging { from, .. } => Some(*from),
            _ => None,
        }
    }

    pub fn hover_index(&self) -> Option<usize> {
        match self {
            ReorderGesture::Dragging { over, .. } => Some(*over),
            _ => None,
        }
    }

    /// Pointer went down on row `index`; `at` is any monotonic timestamp
    pub fn press(&mut self, index: usize, pos: (f32, f32), at: Duration) {
        if *self == ReorderGesture::Idle {
            *self = ReorderGesture::Pending {
                index,
                origin: pos,
                pressed_at: at,
            };
        }
    }

    /// Feed the current pointer position; returns true once dragging
    ///
    /// Leaving the tolerance before the delay elapses turns the press into a
    /// tap or scroll. The gesture then stays aborted, ignoring further
    /// presses, until the button is released.
    pub fn pointer_moved(&mut self, pos: (f32, f32), at: Duration) -> bool {
        if let ReorderGesture::Pending {
            index,
            origin,
            pressed_at,
        } = *self
        {
            let travel = ((pos.0 - origin.0).powi(2) + (pos.1 - origin.1).powi(2)).sqrt();
            if travel > ACTIVATION_TOLERANCE {
                *self = ReorderGesture::Aborted;
            } else if at.saturating_sub(pressed_at) >= ACTIVATION_DELAY {
                *self = ReorderGesture::Dragging {
                    from: index,
                    over: index,
                };
            }
        }
        self.is_dragging()
    }

    /// Row currently under the pointer while dragging
    pub fn hover(&mut self, index: usize) {
        if let ReorderGesture::Dragging { over, .. } = self {
            *over = index;
        }
    }

    /// Pointer released; yields the move to apply, if any
    pub fn release(&mut self) -> Option<ReorderMove> {
        let outcome = match *self {
            ReorderGesture::Dragging { from, over } if from != over => {
                Some(ReorderMove { from, to: over })
            }
            _ => None,
        };
        *self = ReorderGesture::Idle;
        outcome
    }

    /// Pointer cancelled; nothing is applied
    pub fn cancel(&mut self) {
        *self = ReorderGesture::Idle;
    }
}
