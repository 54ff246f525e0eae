//! Tab width allocation.
//!
//! Every tab gets the same width: the space left after the reserved chrome,
//! divided by the tab count and clamped to `[min_width, max_width]`. Once
//! the ideal width drops to the minimum the strip no longer fits and
//! horizontal scrolling is turned on.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Geometry bounds and insets for the strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Narrowest a tab may get.
    pub min_width: f32,
    /// Widest a tab may get.
    pub max_width: f32,
    /// Fixed-width controls subtracted from the viewport before allocation.
    pub reserved_chrome: f32,
    /// Space before the first tab.
    pub leading_inset: f32,
    /// Space after the last tab.
    pub trailing_inset: f32,
    /// Gap between neighbouring tabs.
    pub spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_width: 90.0,
            max_width: 250.0,
            reserved_chrome: 45.0,
            leading_inset: 16.0,
            trailing_inset: 6.0,
            spacing: 6.0,
        }
    }
}

/// Horizontal extent of one tab inside the scrollable content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub left: f32,
    pub width: f32,
}

impl Frame {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn center(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// Width before clamping. `None` when there are no tabs.
pub fn ideal_width(viewport_width: f32, tab_count: usize, reserved_chrome: f32) -> Option<f32> {
    if tab_count == 0 {
        return None;
    }
    let available = (viewport_width - reserved_chrome).max(0.0);
    Some(available / tab_count as f32)
}

/// Uniform per-tab width for the given viewport.
pub fn compute_width(
    viewport_width: f32,
    tab_count: usize,
    reserved_chrome: f32,
    min_width: f32,
    max_width: f32,
) -> Option<f32> {
    ideal_width(viewport_width, tab_count, reserved_chrome).map(|ideal| ideal.clamp(min_width, max_width))
}

/// Result of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSnapshot {
    pub viewport_width: f32,
    pub tab_count: usize,
    pub width_per_tab: f32,
    pub scrolling_enabled: bool,
    pub content_width: f32,
}

/// Caching layout engine.
///
/// Recomputes only when the viewport width or tab count differs from the
/// previous pass, so resize storms stay cheap.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    last_inputs: Option<(f32, usize)>,
    width_per_tab: f32,
    scrolling_enabled: bool,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            last_inputs: None,
            width_per_tab: config.max_width,
            scrolling_enabled: false,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Run a layout pass. Returns `None` when the inputs are unchanged.
    pub fn update(&mut self, viewport_width: f32, tab_count: usize) -> Option<LayoutSnapshot> {
        if self.last_inputs == Some((viewport_width, tab_count)) {
            return None;
        }
        self.last_inputs = Some((viewport_width, tab_count));

        let cfg = &self.config;
        if let Some(ideal) = ideal_width(viewport_width, tab_count, cfg.reserved_chrome) {
            self.width_per_tab = ideal.clamp(cfg.min_width, cfg.max_width);
            self.scrolling_enabled = ideal <= cfg.min_width;
        } else {
            self.scrolling_enabled = false;
        }

        debug!(
            viewport_width,
            tab_count,
            width = self.width_per_tab,
            scrolling = self.scrolling_enabled,
            "layout pass"
        );
        Some(self.snapshot(viewport_width, tab_count))
    }

    /// Force the next [`update`](Self::update) to recompute.
    pub fn invalidate(&mut self) {
        self.last_inputs = None;
    }

    pub fn width_per_tab(&self) -> f32 {
        self.width_per_tab
    }

    pub fn scrolling_enabled(&self) -> bool {
        self.scrolling_enabled
    }

    /// Tabs have shrunk to the minimum width.
    pub fn is_saturated(&self) -> bool {
        self.width_per_tab <= self.config.min_width
    }

    /// Frame of the tab at `index` under the current width.
    pub fn frame_for(&self, index: usize) -> Frame {
        let step = self.width_per_tab + self.config.spacing;
        Frame::new(self.config.leading_inset + index as f32 * step, self.width_per_tab)
    }

    /// Total scrollable width for `tab_count` tabs.
    pub fn content_width(&self, tab_count: usize) -> f32 {
        let cfg = &self.config;
        if tab_count == 0 {
            return cfg.leading_inset + cfg.trailing_inset;
        }
        let n = tab_count as f32;
        cfg.leading_inset + n * self.width_per_tab + (n - 1.0) * cfg.spacing + cfg.trailing_inset
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self, viewport_width: f32, tab_count: usize) -> f32 {
        (self.content_width(tab_count) - viewport_width).max(0.0)
    }

    /// Offset that centers the tab at `index` in the viewport.
    pub fn scroll_target(&self, index: usize, viewport_width: f32, tab_count: usize) -> f32 {
        let target = self.frame_for(index).center() - viewport_width / 2.0;
        target.clamp(0.0, self.max_scroll(viewport_width, tab_count))
    }

    fn snapshot(&self, viewport_width: f32, tab_count: usize) -> LayoutSnapshot {
        LayoutSnapshot {
            viewport_width,
            tab_count,
            width_per_tab: self.width_per_tab,
            scrolling_enabled: self.scrolling_enabled,
            content_width: self.content_width(tab_count),
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPS: f32 = 0.01;

    #[test]
    fn roomy_viewport_keeps_ideal_width() {
        let width = compute_width(400.0, 3, 45.0, 90.0, 250.0).unwrap();
        assert!((width - 118.33).abs() < EPS);

        let mut engine = LayoutEngine::default();
        let snap = engine.update(400.0, 3).unwrap();
        assert!(!snap.scrolling_enabled);
    }

    #[test]
    fn narrow_viewport_clamps_to_min_and_scrolls() {
        let ideal = ideal_width(200.0, 3, 45.0).unwrap();
        assert!((ideal - 51.67).abs() < EPS);

        let mut engine = LayoutEngine::default();
        let snap = engine.update(200.0, 3).unwrap();
        assert_eq!(snap.width_per_tab, 90.0);
        assert!(snap.scrolling_enabled);
        assert!(engine.is_saturated());
    }

    #[test]
    fn zero_tabs_is_a_no_op() {
        assert_eq!(compute_width(400.0, 0, 45.0, 90.0, 250.0), None);
    }

    #[rstest]
    #[case(0.0, 1)]
    #[case(10.0, 1)]
    #[case(45.0, 4)]
    #[case(300.0, 2)]
    #[case(5000.0, 1)]
    #[case(5000.0, 64)]
    #[case(1_000_000.0, 3)]
    fn width_stays_within_bounds(#[case] viewport: f32, #[case] count: usize) {
        let width = compute_width(viewport, count, 45.0, 90.0, 250.0).unwrap();
        assert!((90.0..=250.0).contains(&width));
    }

    #[test]
    fn compute_is_idempotent() {
        let a = compute_width(733.0, 5, 45.0, 90.0, 250.0);
        let b = compute_width(733.0, 5, 45.0, 90.0, 250.0);
        assert_eq!(a, b);
    }

    #[test]
    fn engine_skips_unchanged_inputs() {
        let mut engine = LayoutEngine::default();
        assert!(engine.update(800.0, 4).is_some());
        assert!(engine.update(800.0, 4).is_none());
        assert!(engine.update(800.0, 5).is_some());

        engine.invalidate();
        assert!(engine.update(800.0, 5).is_some());
    }

    #[test]
    fn frames_follow_insets_and_spacing() {
        let mut engine = LayoutEngine::default();
        engine.update(200.0, 3);
        assert_eq!(engine.frame_for(0), Frame::new(16.0, 90.0));
        assert_eq!(engine.frame_for(2), Frame::new(16.0 + 2.0 * 96.0, 90.0));
        assert_eq!(engine.content_width(3), 16.0 + 270.0 + 12.0 + 6.0);
    }

    #[test]
    fn scroll_target_is_clamped() {
        let mut engine = LayoutEngine::default();
        engine.update(200.0, 10);
        assert_eq!(engine.scroll_target(0, 200.0, 10), 0.0);
        let max = engine.max_scroll(200.0, 10);
        assert_eq!(engine.scroll_target(9, 200.0, 10), max);
    }
}
