//! Card stack geometry
//!
//! Cards run full width below the header, one per zone, in list order.
//! All coordinates are nannou window coordinates (origin at the center,
//! y up).

use nannou::prelude::*;
use shared::DEFAULT_TRACK_MARGIN;

pub const CARD_HEIGHT: f32 = 96.0;
pub const CARD_GAP: f32 = 10.0;

/// Height reserved for the egui header panel
pub const HEADER_HEIGHT: f32 = 48.0;

/// Vertical space one card takes, gap included
const CARD_PITCH: f32 = CARD_HEIGHT + CARD_GAP;

/// Where the stack sits in the window
#[derive(Debug, Clone, Copy)]
pub struct StackLayout {
    pub left: f32,
    pub right: f32,
    /// Top edge of the first card before scrolling
    pub top: f32,
    pub bottom: f32,
    pub scroll: f32,
}

impl StackLayout {
    pub fn calculate(window_rect: Rect, scroll: f32) -> Self {
        Self {
            left: window_rect.left() + DEFAULT_TRACK_MARGIN,
            right: window_rect.right() - DEFAULT_TRACK_MARGIN,
            top: window_rect.top() - HEADER_HEIGHT - CARD_GAP,
            bottom: window_rect.bottom(),
            scroll,
        }
    }

    pub fn card_width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    pub fn card_rect(&self, index: usize) -> Rect {
        let top = self.top + self.scroll - index as f32 * CARD_PITCH;
        Rect::from_x_y_w_h(
            (self.left + self.right) / 2.0,
            top - CARD_HEIGHT / 2.0,
            self.card_width(),
            CARD_HEIGHT,
        )
    }

    /// Index of the card under `pos`, if any
    pub fn hit_test(&self, pos: Point2, count: usize) -> Option<usize> {
        if pos.y > self.top {
            return None;
        }
        (0..count).find(|&i| self.card_rect(i).contains(pos))
    }

    /// Largest scroll that still keeps the last card on screen
    pub fn max_scroll(&self, count: usize) -> f32 {
        let content = count as f32 * CARD_PITCH;
        let visible = self.top - self.bottom;
        (content - visible).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_x_y_w_h(0.0, 0.0, 400.0, 600.0)
    }

    #[test]
    fn test_cards_stack_downward() {
        let layout = StackLayout::calculate(window(), 0.0);
        let first = layout.card_rect(0);
        let second = layout.card_rect(1);
        assert!((first.top() - (300.0 - HEADER_HEIGHT - CARD_GAP)).abs() < 1e-3);
        assert!((first.bottom() - second.top() - CARD_GAP).abs() < 1e-3);
        assert!((first.w() - 368.0).abs() < 1e-3);
    }

    #[test]
    fn test_hit_test() {
        let layout = StackLayout::calculate(window(), 0.0);
        let inside_second = layout.card_rect(1).xy();
        assert_eq!(layout.hit_test(inside_second, 3), Some(1));
        assert_eq!(layout.hit_test(inside_second, 1), None);

        let in_gap = pt2(0.0, layout.card_rect(0).bottom() - CARD_GAP / 2.0);
        assert_eq!(layout.hit_test(in_gap, 3), None);

        let in_margin = pt2(-195.0, layout.card_rect(0).y());
        assert_eq!(layout.hit_test(in_margin, 3), None);
    }

    #[test]
    fn test_scrolled_cards_hide_under_header() {
        let layout = StackLayout::calculate(window(), CARD_HEIGHT + CARD_GAP);
        let under_header = layout.card_rect(0).xy();
        assert_eq!(layout.hit_test(under_header, 3), None);
        assert_eq!(layout.hit_test(layout.card_rect(1).xy(), 3), Some(1));
    }

    #[test]
    fn test_max_scroll() {
        let layout = StackLayout::calculate(window(), 0.0);
        assert_eq!(layout.max_scroll(2), 0.0);
        assert!(layout.max_scroll(10) > 0.0);
    }
}
