//! UI module - egui components
//!
//! Provides:
//! - Header bar: selected-date button and the manage button
//! - Date picker window over the reference-zone calendar
//! - Manage Zones window: search, add, remove, and drag-to-reorder

use std::time::Duration;

use nannou_egui::egui;
use shared::{MonthView, ReorderGesture, ZoneListEditor, WEEKDAY_LABELS};

/// Result of header interactions
#[derive(Default)]
pub struct HeaderResult {
    pub toggle_date_picker: bool,
    pub open_manage: bool,
}

/// Draw the header bar
pub fn draw_header(ctx: &egui::Context, date_label: &str) -> HeaderResult {
    let mut result = HeaderResult::default();

    egui::TopBottomPanel::top("header_bar")
        .resizable(false)
        .exact_height(crate::cards::HEADER_HEIGHT)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.heading("ZoneBuddy");
                ui.add_space(12.0);
                if ui
                    .button(format!("📅 {}", date_label))
                    .on_hover_text("Pick a date")
                    .clicked()
                {
                    result.toggle_date_picker = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Manage").clicked() {
                        result.open_manage = true;
                    }
                });
            });
        });

    result
}

/// State for the date picker window
#[derive(Default)]
pub struct DatePickerState {
    pub is_open: bool,
    pub view: Option<MonthView>,
}

impl DatePickerState {
    pub fn open(&mut self, view: MonthView) {
        self.is_open = true;
        self.view = Some(view);
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.view = None;
    }
}

/// Result of date picker interactions
#[derive(Default)]
pub struct DatePickerResult {
    /// Day of the shown month the user picked
    pub select_day: Option<(MonthView, u32)>,
    pub close: bool,
}

/// Draw the date picker; `is_selected` marks the selected day
pub fn draw_date_picker(
    ctx: &egui::Context,
    state: &mut DatePickerState,
    is_selected: impl Fn(&MonthView, u32) -> bool,
) -> DatePickerResult {
    let mut result = DatePickerResult::default();
    let Some(mut view) = state.view else {
        return result;
    };

    egui::Window::new("Select Date")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, [0.0, 60.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("←").clicked() {
                    view = view.previous();
                }
                ui.label(egui::RichText::new(view.title()).strong());
                if ui.button("→").clicked() {
                    view = view.next();
                }
            });

            ui.separator();

            egui::Grid::new("month_grid")
                .num_columns(7)
                .spacing([6.0, 4.0])
                .show(ui, |ui| {
                    for label in WEEKDAY_LABELS {
                        ui.label(
                            egui::RichText::new(label)
                                .size(11.0)
                                .color(egui::Color32::from_rgb(150, 155, 165)),
                        );
                    }
                    ui.end_row();

                    for (slot, day) in view.slots().into_iter().enumerate() {
                        match day {
                            Some(day) => {
                                let selected = is_selected(&view, day);
                                if ui.selectable_label(selected, day.to_string()).clicked() {
                                    result.select_day = Some((view, day));
                                    result.close = true;
                                }
                            }
                            None => {
                                ui.label("");
                            }
                        }
                        if slot % 7 == 6 {
                            ui.end_row();
                        }
                    }
                });

            ui.separator();

            if ui.button("Close").clicked() {
                result.close = true;
            }
        });

    state.view = Some(view);

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result.close = true;
    }

    result
}

/// State for the Manage Zones window
///
/// Holds the editing session while the window is open; closing it either
/// commits or drops the editor.
#[derive(Default)]
pub struct ManageZonesState {
    pub editor: Option<ZoneListEditor>,
    pub gesture: ReorderGesture,
    pub search_query: String,
    pub should_focus_search: bool,
}

impl ManageZonesState {
    pub fn is_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn open(&mut self, editor: ZoneListEditor) {
        self.editor = Some(editor);
        self.gesture = ReorderGesture::Idle;
        self.search_query.clear();
        self.should_focus_search = true;
    }

    /// End the session, handing back the editor
    pub fn close(&mut self) -> Option<ZoneListEditor> {
        self.gesture.cancel();
        self.search_query.clear();
        self.editor.take()
    }
}

/// How the Manage Zones window was left this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageOutcome {
    Commit,
    Discard,
}

/// Draw the Manage Zones window
pub fn draw_manage_zones(ctx: &egui::Context, state: &mut ManageZonesState) -> Option<ManageOutcome> {
    let mut outcome = None;
    let Some(editor) = state.editor.as_mut() else {
        return None;
    };

    let mut row_rects: Vec<egui::Rect> = Vec::with_capacity(editor.draft().len());
    let mut remove: Option<String> = None;
    let mut move_up: Option<usize> = None;
    let mut move_down: Option<usize> = None;

    egui::Window::new("Manage Time Zones")
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .default_height(560.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            // Current list
            ui.label(
                egui::RichText::new(format!("Your Zones ({})", editor.draft().len()))
                    .size(12.0)
                    .color(egui::Color32::from_rgb(160, 165, 175)),
            );
            ui.add_space(4.0);

            let dragged = state.gesture.dragged_index();
            let hovered = state.gesture.hover_index();
            let count = editor.draft().len();

            for (index, entry) in editor.draft().iter().enumerate() {
                let row = ui.horizontal(|ui| {
                    let handle_text = egui::RichText::new("☰").size(16.0);
                    let handle_text = if dragged == Some(index) {
                        handle_text.color(egui::Color32::from_rgb(255, 179, 71))
                    } else {
                        handle_text
                    };
                    let handle = ui
                        .add(egui::Label::new(handle_text).sense(egui::Sense::drag()))
                        .on_hover_text("Hold to drag");
                    let pressed_now = ui.input(|i| i.pointer.primary_pressed());
                    if pressed_now && handle.is_pointer_button_down_on() {
                        if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                            let now = Duration::from_secs_f64(ui.input(|i| i.time));
                            state.gesture.press(index, (pos.x, pos.y), now);
                        }
                    }

                    ui.label(entry.glyph.as_str());
                    ui.vertical(|ui| {
                        ui.label(entry.display_name.as_str());
                        let detail = match &entry.label {
                            Some(label) => format!("{} · {}", label, entry.zone_identifier),
                            None => entry.zone_identifier.clone(),
                        };
                        ui.label(
                            egui::RichText::new(detail)
                                .size(11.0)
                                .color(egui::Color32::from_rgb(140, 145, 155)),
                        );
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").on_hover_text("Remove").clicked() {
                            remove = Some(entry.id.clone());
                        }
                        if ui
                            .add_enabled(index + 1 < count, egui::Button::new("▼").small())
                            .clicked()
                        {
                            move_down = Some(index);
                        }
                        if ui
                            .add_enabled(index > 0, egui::Button::new("▲").small())
                            .clicked()
                        {
                            move_up = Some(index);
                        }
                    });
                });
                row_rects.push(row.response.rect);
            }

            // Drop marker above the row being hovered
            if let (Some(from), Some(over)) = (dragged, hovered) {
                if from != over {
                    if let Some(rect) = row_rects.get(over) {
                        let y = if over > from { rect.bottom() } else { rect.top() };
                        ui.painter().line_segment(
                            [egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)],
                            egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 179, 71)),
                        );
                    }
                }
            }

            ui.add_space(8.0);
            ui.separator();

            // Directory search
            ui.horizontal(|ui| {
                ui.label("Search:");
                let response = ui.text_edit_singleline(&mut state.search_query);
                if state.should_focus_search {
                    response.request_focus();
                    state.should_focus_search = false;
                }
            });

            let mut add_city = None;
            egui::ScrollArea::vertical()
                .max_height(220.0)
                .show(ui, |ui| {
                    for city in editor.filter(&state.search_query) {
                        let added = editor.contains(city.id);
                        let label = if added {
                            format!("{} {}  ✓", city.glyph, city.name)
                        } else {
                            format!("{} {}", city.glyph, city.name)
                        };
                        let response = ui
                            .add_enabled(!added, egui::Button::new(label).frame(false))
                            .on_hover_text(city.zone);
                        if response.clicked() {
                            add_city = Some(city);
                        }
                    }
                });
            if let Some(city) = add_city {
                editor.add_city(city);
            }

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Done").clicked() {
                    outcome = Some(ManageOutcome::Commit);
                }
                if ui.button("Cancel").clicked() {
                    outcome = Some(ManageOutcome::Discard);
                }
            });
        });

    // Row edits
    if let Some(id) = remove {
        state.gesture.cancel();
        editor.remove(&id);
    }
    if let Some(index) = move_up {
        editor.move_up(index);
    }
    if let Some(index) = move_down {
        editor.move_down(index);
    }

    // Drag-to-reorder
    let (pointer, primary_down, time) = ctx.input(|i| {
        (
            i.pointer.interact_pos(),
            i.pointer.primary_down(),
            Duration::from_secs_f64(i.time),
        )
    });
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        if state.gesture.is_dragging() {
            state.gesture.cancel();
        } else {
            outcome = Some(ManageOutcome::Discard);
        }
    } else if primary_down {
        if let Some(pos) = pointer {
            if state.gesture.pointer_moved((pos.x, pos.y), time) {
                if let Some(over) = row_rects
                    .iter()
                    .position(|rect| pos.y >= rect.top() && pos.y <= rect.bottom())
                {
                    state.gesture.hover(over);
                } else if let Some(last) = row_rects.last() {
                    if pos.y > last.bottom() {
                        state.gesture.hover(row_rects.len() - 1);
                    } else if row_rects.first().map(|r| pos.y < r.top()).unwrap_or(false) {
                        state.gesture.hover(0);
                    }
                }
            }
        }
    } else if let Some(reorder) = state.gesture.release() {
        editor.reorder(reorder.from, reorder.to);
    }

    outcome
}
