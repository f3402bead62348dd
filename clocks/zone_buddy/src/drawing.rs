//! Drawing module - zone card rendering
//!
//! Cards are painted with nannou primitives only: a stepped diagonal
//! gradient, the time indicator line, then the text.

use nannou::prelude::*;
use shared::{CardView, Rgb, TrackGeometry, ZoneEntry, ZoneResolutionError};

use crate::cards::StackLayout;

/// Color palette for the app chrome (card colors come from the presenter)
#[allow(dead_code)]
pub mod colors {
    use nannou::prelude::*;

    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 14,
        green: 17,
        blue: 24,
        standard: std::marker::PhantomData,
    };

    /// Placeholder card for zones that failed to resolve
    pub const ERROR_CARD: Srgb<u8> = Srgb {
        red: 58,
        green: 36,
        blue: 40,
        standard: std::marker::PhantomData,
    };

    pub const ERROR_TEXT: Srgb<u8> = Srgb {
        red: 240,
        green: 170,
        blue: 170,
        standard: std::marker::PhantomData,
    };

    pub const SECONDARY_TEXT: Srgb<u8> = Srgb {
        red: 150,
        green: 155,
        blue: 165,
        standard: std::marker::PhantomData,
    };

    pub const SCRUB_OUTLINE: Srgb<u8> = Srgb {
        red: 255,
        green: 255,
        blue: 255,
        standard: std::marker::PhantomData,
    };
}

/// Cells per card gradient, across and down
const GRADIENT_COLUMNS: usize = 32;
const GRADIENT_ROWS: usize = 6;

fn to_srgb(color: Rgb) -> Srgb<u8> {
    srgb(color.red, color.green, color.blue)
}

fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}

/// Draw every card of the stack
pub fn draw_card_stack(
    draw: &Draw,
    window_rect: Rect,
    layout: &StackLayout,
    track: &TrackGeometry,
    cards: &[(&ZoneEntry, Result<CardView, ZoneResolutionError>)],
    hovered: Option<usize>,
    scrubbing: bool,
) {
    for (index, (entry, view)) in cards.iter().enumerate() {
        let rect = layout.card_rect(index);
        // Skip anything fully outside the window
        if rect.bottom() > window_rect.top() || rect.top() < window_rect.bottom() {
            continue;
        }
        match view {
            Ok(card) => {
                let highlighted = hovered == Some(index);
                draw_card(draw, rect, window_rect, track, card, highlighted, scrubbing);
            }
            Err(err) => draw_error_card(draw, rect, entry, err),
        }
    }
}

fn draw_card(
    draw: &Draw,
    rect: Rect,
    window_rect: Rect,
    track: &TrackGeometry,
    card: &CardView,
    highlighted: bool,
    scrubbing: bool,
) {
    draw_gradient(draw, rect, card.gradient);

    let text = to_srgb(card.text_color);
    let faded = srgba(text.red, text.green, text.blue, 170u8);

    // Outline while hovered or scrubbing
    if highlighted {
        let alpha = if scrubbing { 220u8 } else { 90u8 };
        draw.rect()
            .xy(rect.xy())
            .wh(rect.wh())
            .no_fill()
            .stroke(srgba(
                colors::SCRUB_OUTLINE.red,
                colors::SCRUB_OUTLINE.green,
                colors::SCRUB_OUTLINE.blue,
                alpha,
            ))
            .stroke_weight(2.0);
    }

    // Time indicator at the card's own local time
    let indicator_x = window_rect.left() + track.fraction_to_position(card.indicator_fraction);
    draw.line()
        .start(pt2(indicator_x, rect.bottom() + 8.0))
        .end(pt2(indicator_x, rect.top() - 8.0))
        .color(srgba(text.red, text.green, text.blue, 140u8))
        .stroke_weight(2.0);
    draw.ellipse()
        .x_y(indicator_x, rect.top() - 8.0)
        .radius(3.5)
        .color(text);

    // Glyph
    draw.text(&card.glyph)
        .x_y(rect.left() + 32.0, rect.y())
        .w(48.0)
        .color(text)
        .font_size(28)
        .center_justify();

    // Title + subtitle, left column
    let column_w = rect.w() * 0.5;
    let column_x = rect.left() + 64.0 + column_w / 2.0;
    draw.text(&card.title)
        .x_y(column_x, rect.y() + 12.0)
        .w(column_w)
        .color(text)
        .font_size(20)
        .left_justify();
    draw.text(&card.subtitle)
        .x_y(column_x, rect.y() - 14.0)
        .w(column_w)
        .color(faded)
        .font_size(12)
        .left_justify();

    // Time + period, right column
    let right_w = 180.0;
    let right_x = rect.right() - 56.0 - right_w / 2.0;
    draw.text(&card.time_text)
        .x_y(right_x, rect.y() - 4.0)
        .w(right_w)
        .color(text)
        .font_size(34)
        .right_justify();
    draw.text(&card.period.to_string())
        .x_y(rect.right() - 30.0, rect.y() - 10.0)
        .w(40.0)
        .color(faded)
        .font_size(14)
        .center_justify();

    if let Some(badge) = &card.day_badge {
        draw.text(badge)
            .x_y(rect.right() - 30.0, rect.top() - 20.0)
            .w(40.0)
            .color(text)
            .font_size(12)
            .center_justify();
    }
}

/// Position along a 135° gradient line for an offset from the rect center
///
/// 0 at the top-left corner, 1 at the bottom-right, y pointing up.
fn diagonal_t(dx: f32, dy: f32, w: f32, h: f32) -> f32 {
    let span = w + h;
    if span <= 0.0 {
        return 0.0;
    }
    (0.5 + (dx - dy) / span).clamp(0.0, 1.0)
}

/// Top-left to bottom-right gradient approximated with a grid of cells
fn draw_gradient(draw: &Draw, rect: Rect, (from, to): (Rgb, Rgb)) {
    let cell_w = rect.w() / GRADIENT_COLUMNS as f32;
    let cell_h = rect.h() / GRADIENT_ROWS as f32;
    for row in 0..GRADIENT_ROWS {
        for column in 0..GRADIENT_COLUMNS {
            let x = rect.left() + cell_w * (column as f32 + 0.5);
            let y = rect.top() - cell_h * (row as f32 + 0.5);
            let t = diagonal_t(x - rect.x(), y - rect.y(), rect.w(), rect.h());
            let color = srgb(
                lerp_channel(from.red, to.red, t),
                lerp_channel(from.green, to.green, t),
                lerp_channel(from.blue, to.blue, t),
            );
            // +0.5 px overlap hides seams between cells
            draw.rect()
                .x_y(x, y)
                .w_h(cell_w + 0.5, cell_h + 0.5)
                .color(color);
        }
    }
}

fn draw_error_card(draw: &Draw, rect: Rect, entry: &ZoneEntry, err: &ZoneResolutionError) {
    draw.rect()
        .xy(rect.xy())
        .wh(rect.wh())
        .color(colors::ERROR_CARD);

    let column_w = rect.w() - 40.0;
    draw.text(&entry.display_name)
        .x_y(rect.x(), rect.y() + 12.0)
        .w(column_w)
        .color(colors::ERROR_TEXT)
        .font_size(18)
        .left_justify();
    draw.text(&err.to_string())
        .x_y(rect.x(), rect.y() - 14.0)
        .w(column_w)
        .color(colors::SECONDARY_TEXT)
        .font_size(12)
        .left_justify();
}

/// Hint shown when the list is empty
pub fn draw_empty_hint(draw: &Draw, layout: &StackLayout) {
    draw.text("No time zones yet. Open Manage to add some.")
        .x_y((layout.left + layout.right) / 2.0, layout.top - 60.0)
        .w(layout.card_width())
        .color(colors::SECONDARY_TEXT)
        .font_size(14)
        .center_justify();
}
