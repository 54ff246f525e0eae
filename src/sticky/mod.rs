//! Sticky edge pinning for the selected tab.
//!
//! When the selected tab scrolls past either edge of the viewport the
//! renderer shows a pinned copy of it at that edge. This module decides
//! which edge, and reports only transitions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::Frame;

/// Where the selected tab is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StickyPosition {
    #[default]
    None,
    Left,
    Right,
}

impl std::fmt::Display for StickyPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StickyPosition::None => write!(f, "none"),
            StickyPosition::Left => write!(f, "left"),
            StickyPosition::Right => write!(f, "right"),
        }
    }
}

/// Inputs of one sticky evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyInputs {
    pub scroll_offset: f32,
    pub viewport_width: f32,
    pub content_width: f32,
    pub selected: Frame,
}

/// A sticky state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickyTransition {
    pub from: StickyPosition,
    pub to: StickyPosition,
}

/// Pin position the inputs call for, ignoring the current state.
pub fn sticky_target(inputs: &StickyInputs) -> StickyPosition {
    let scroll = inputs.scroll_offset;
    let visible_end = scroll + inputs.viewport_width;

    if scroll > 0.0 && inputs.selected.left < scroll {
        StickyPosition::Left
    } else if inputs.content_width > visible_end && inputs.selected.right() > visible_end {
        StickyPosition::Right
    } else {
        StickyPosition::None
    }
}

/// Edge-triggered sticky state machine.
#[derive(Debug, Clone, Default)]
pub struct StickyController {
    position: StickyPosition,
    last_known_selected_frame: Option<Frame>,
    last_pass: Option<(StickyInputs, bool)>,
}

impl StickyController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> StickyPosition {
        self.position
    }

    pub fn last_known_selected_frame(&self) -> Option<Frame> {
        self.last_known_selected_frame
    }

    /// Re-evaluate on a scroll or layout event.
    ///
    /// `saturated` tells whether tabs are at minimum width; pinning is not
    /// activated before that. Returns the transition, if any.
    pub fn evaluate(&mut self, inputs: StickyInputs, saturated: bool) -> Option<StickyTransition> {
        if self.last_pass == Some((inputs, saturated)) {
            return None;
        }
        self.last_pass = Some((inputs, saturated));

        if self.last_known_selected_frame != Some(inputs.selected) {
            self.last_known_selected_frame = Some(inputs.selected);
        }

        let target = sticky_target(&inputs);
        if target == self.position {
            return None;
        }
        if target != StickyPosition::None && !saturated {
            debug!(%target, "pin suppressed, strip still has slack");
            return None;
        }

        Some(self.transition_to(target))
    }

    /// Drop any pin. Used on removal and selection.
    pub fn reset(&mut self) -> Option<StickyTransition> {
        self.last_pass = None;
        self.last_known_selected_frame = None;
        if self.position == StickyPosition::None {
            return None;
        }
        Some(self.transition_to(StickyPosition::None))
    }

    fn transition_to(&mut self, to: StickyPosition) -> StickyTransition {
        let from = self.position;
        self.position = to;
        debug!(%from, %to, "sticky transition");
        StickyTransition { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn inputs(scroll: f32, left: f32) -> StickyInputs {
        StickyInputs {
            scroll_offset: scroll,
            viewport_width: 300.0,
            content_width: 1000.0,
            selected: Frame::new(left, 90.0),
        }
    }

    #[test]
    fn tab_scrolled_past_left_edge_pins_left() {
        assert_eq!(sticky_target(&inputs(600.0, 500.0)), StickyPosition::Left);
    }

    #[rstest]
    #[case(0.0, 100.0, StickyPosition::None)]
    #[case(0.0, 350.0, StickyPosition::Right)]
    #[case(100.0, 50.0, StickyPosition::Left)]
    #[case(100.0, 200.0, StickyPosition::None)]
    #[case(700.0, 904.0, StickyPosition::None)]
    fn target_rules(#[case] scroll: f32, #[case] left: f32, #[case] expected: StickyPosition) {
        assert_eq!(sticky_target(&inputs(scroll, left)), expected);
    }

    #[test]
    fn right_needs_hidden_content() {
        let i = StickyInputs {
            scroll_offset: 0.0,
            viewport_width: 300.0,
            content_width: 300.0,
            selected: Frame::new(250.0, 90.0),
        };
        assert_eq!(sticky_target(&i), StickyPosition::None);
    }

    #[test]
    fn transitions_are_edge_triggered() {
        let mut sticky = StickyController::new();
        let first = sticky.evaluate(inputs(600.0, 500.0), true);
        assert_eq!(
            first,
            Some(StickyTransition {
                from: StickyPosition::None,
                to: StickyPosition::Left
            })
        );
        assert_eq!(sticky.evaluate(inputs(610.0, 500.0), true), None);
        assert_eq!(sticky.position(), StickyPosition::Left);

        let back = sticky.evaluate(inputs(400.0, 500.0), true);
        assert_eq!(back.map(|t| t.to), Some(StickyPosition::None));
    }

    #[test]
    fn pin_waits_for_saturation() {
        let mut sticky = StickyController::new();
        assert_eq!(sticky.evaluate(inputs(600.0, 500.0), false), None);
        assert_eq!(sticky.position(), StickyPosition::None);

        let pinned = sticky.evaluate(inputs(600.0, 500.0), true);
        assert_eq!(pinned.map(|t| t.to), Some(StickyPosition::Left));
    }

    #[test]
    fn reset_unpins_once() {
        let mut sticky = StickyController::new();
        sticky.evaluate(inputs(0.0, 350.0), true);
        assert_eq!(sticky.position(), StickyPosition::Right);

        assert_eq!(sticky.reset().map(|t| t.to), Some(StickyPosition::None));
        assert_eq!(sticky.reset(), None);
        assert_eq!(sticky.last_known_selected_frame(), None);
    }

    #[test]
    fn caches_selected_frame() {
        let mut sticky = StickyController::new();
        sticky.evaluate(inputs(0.0, 120.0), true);
        assert_eq!(sticky.last_known_selected_frame(), Some(Frame::new(120.0, 90.0)));
    }
}
