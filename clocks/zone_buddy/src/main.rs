//! ZoneBuddy
//!
//! A stack of time-zone cards that share one selected instant. Dragging
//! across any card scrubs the time of day in the reference zone and every
//! card follows; the header date button moves the calendar date.

mod cards;
mod drawing;
mod ui;

use chrono::Utc;
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use shared::{detect_reference_zone, AppState, ReorderGesture, SettingsStore};

use crate::cards::StackLayout;
use crate::drawing::{colors, draw_card_stack, draw_empty_hint};
use crate::ui::{
    draw_date_picker, draw_header, draw_manage_zones, DatePickerState, ManageOutcome,
    ManageZonesState,
};

/// Pixels scrolled per wheel line
const SCROLL_LINE: f32 = 40.0;

fn main() {
    shared::logging::init();
    nannou::app(model).update(update).run();
}

/// Application state
pub struct Model {
    /// Selected instant, zone list, and persistence
    pub state: AppState,

    /// Vertical scroll of the card stack
    pub scroll: f32,
    /// Card under the pointer (if any)
    pub hovered_card: Option<usize>,

    pub date_picker: DatePickerState,
    pub manage: ManageZonesState,

    /// egui integration
    egui: Egui,
}

impl Model {
    /// Whether an egui window should receive pointer input instead of the cards
    fn modal_open(&self) -> bool {
        self.manage.is_open() || self.date_picker.is_open
    }

    fn layout(&self, window_rect: Rect) -> StackLayout {
        StackLayout::calculate(window_rect, self.scroll)
    }

    fn clamp_scroll(&mut self, window_rect: Rect) {
        let max = self.layout(window_rect).max_scroll(self.state.zones().len());
        self.scroll = self.scroll.clamp(0.0, max);
    }
}

fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("ZoneBuddy")
        .size(520, 760)
        .min_size(360, 400)
        .view(view)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .mouse_wheel(mouse_wheel)
        .unfocused(unfocused)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let reference_zone = detect_reference_zone();
    let mut state = AppState::load(SettingsStore::open_default(), reference_zone, Utc::now());
    state.set_viewport_width(app.window_rect().w());
    tracing::info!(
        reference = state.reference_zone(),
        width = app.window_rect().w(),
        "window ready"
    );

    Model {
        state,
        scroll: 0.0,
        hovered_card: None,
        date_picker: DatePickerState::default(),
        manage: ManageZonesState::default(),
        egui,
    }
}

fn update(app: &App, model: &mut Model, update: Update) {
    let window_rect = app.window_rect();
    model.state.set_viewport_width(window_rect.w());
    model.clamp_scroll(window_rect);

    let date_label = model.state.date_label();

    // Begin egui frame
    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let header = draw_header(&ctx, &date_label);

    let state = &model.state;
    let picker_result = draw_date_picker(&ctx, &mut model.date_picker, |view, day| {
        state.is_day_selected(view, day)
    });

    let manage_outcome = draw_manage_zones(&ctx, &mut model.manage);

    drop(ctx);

    // Apply header results
    if header.toggle_date_picker {
        if model.date_picker.is_open {
            model.date_picker.close();
        } else if !model.manage.is_open() {
            let view = model.state.month_view();
            tracing::debug!(year = view.year(), month = view.month(), "date picker opened");
            model.date_picker.open(view);
        }
    }
    if header.open_manage && !model.manage.is_open() {
        model.date_picker.close();
        model.state.end_scrub();
        model.manage.open(model.state.open_editor());
        tracing::debug!("manage zones opened");
    }

    // Apply date picker results
    if let Some((view, day)) = picker_result.select_day {
        tracing::debug!(year = view.year(), month = view.month(), day, "date picked");
        model.state.select_day(&view, day);
    }
    if picker_result.close {
        model.date_picker.close();
    }

    // Apply manage results
    match manage_outcome {
        Some(ManageOutcome::Commit) => {
            if let Some(editor) = model.manage.close() {
                tracing::debug!(zones = editor.draft().len(), "manage zones closed with Done");
                model.state.commit_editor(editor);
                model.clamp_scroll(window_rect);
            }
        }
        Some(ManageOutcome::Discard) => {
            if let Some(editor) = model.manage.close() {
                tracing::debug!("manage zones closed without saving");
                editor.discard();
            }
        }
        None => {}
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    // Clear background
    draw.background().color(colors::BACKGROUND);

    let layout = model.layout(window_rect);
    let cards = model.state.cards();
    if cards.is_empty() {
        draw_empty_hint(&draw, &layout);
    } else {
        draw_card_stack(
            &draw,
            window_rect,
            &layout,
            &model.state.track(),
            &cards,
            model.hovered_card,
            model.state.is_scrubbing(),
        );
    }

    // Render to frame
    draw.to_frame(app, &frame).unwrap();

    // Render egui on top
    model.egui.draw_to_frame(&frame).unwrap();
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left || model.modal_open() {
        return;
    }

    let pos = app.mouse.position();
    let window_rect = app.window_rect();
    let layout = model.layout(window_rect);

    if let Some(index) = layout.hit_test(pos, model.state.zones().len()) {
        model.hovered_card = Some(index);
        model.state.begin_scrub(pos.x - window_rect.left());
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.state.end_scrub();
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    let window_rect = app.window_rect();

    // The scrub keeps the pointer even after it leaves the card
    if model.state.is_scrubbing() {
        model.state.scrub_moved(pos.x - window_rect.left());
        return;
    }

    model.hovered_card = if model.modal_open() {
        None
    } else {
        model
            .layout(window_rect)
            .hit_test(pos, model.state.zones().len())
    };
}

fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    if model.modal_open() {
        return;
    }

    let scroll_y = match delta {
        MouseScrollDelta::LineDelta(_, y) => y * SCROLL_LINE,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
    };

    // Wheel up reveals earlier cards
    model.scroll -= scroll_y;
    model.clamp_scroll(app.window_rect());
}

/// Focus loss cancels any pointer gesture in progress
fn unfocused(_app: &App, model: &mut Model) {
    if model.state.is_scrubbing() || model.manage.gesture != ReorderGesture::Idle {
        tracing::debug!("window lost focus; pointer gestures cancelled");
    }
    model.state.end_scrub();
    model.manage.gesture.cancel();
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
