//! Scrolling tab strip widget.
//!
//! Draws the part of the strip that falls inside the viewport at the current
//! scroll offset. When the selected tab is pinned, a copy of its button is
//! drawn over the matching edge so it stays visible while scrolled away.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::layout::Frame;
use crate::state::TabActivity;
use crate::sticky::StickyPosition;
use crate::strip::{TabButton, TabStripView};
use crate::ui::widgets::{ButtonContext, StripButton};
use crate::ui::Theme;

const SCROLL_LEFT_HINT: &str = "‹";
const SCROLL_RIGHT_HINT: &str = "›";

/// Renders a [`TabStripView`] and its buttons.
pub struct TabStripWidget<'a> {
    view: TabStripView<'a>,
    buttons: &'a [Box<dyn StripButton>],
    theme: &'a Theme,
    animation_frame: usize,
}

impl<'a> TabStripWidget<'a> {
    pub fn new(view: TabStripView<'a>, buttons: &'a [Box<dyn StripButton>], theme: &'a Theme) -> Self {
        Self {
            view,
            buttons,
            theme,
            animation_frame: 0,
        }
    }

    /// Set animation frame for loading spinners
    pub fn animation_frame(mut self, frame: usize) -> Self {
        self.animation_frame = frame;
        self
    }

    fn context(&self, index: usize, pinned: bool) -> ButtonContext {
        ButtonContext {
            activity: self
                .view
                .tabs
                .get(index)
                .map_or(TabActivity::Dormant, |t| t.activity()),
            pinned,
            animation_frame: self.animation_frame,
        }
    }
}

impl<'a> Widget for TabStripWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let scroll = self.view.scroll_offset.round() as i32;
        for (index, button) in self.buttons.iter().enumerate() {
            let (left, width) = cells(button.frame());
            let start = left - scroll;
            if start + width as i32 <= 0 || start >= area.width as i32 {
                continue;
            }
            let scratch = draw_button(button.as_ref(), width, area.height, self.theme, self.context(index, false));
            blit(&scratch, start, area, buf);
        }

        let pinned = self.view.pinned();
        if let Some((index, _)) = pinned {
            if let Some(button) = self.buttons.get(index) {
                let (_, width) = cells(button.frame());
                let width = width.min(area.width);
                let start = match self.view.sticky {
                    StickyPosition::Right => (area.width - width) as i32,
                    _ => 0,
                };
                let scratch = draw_button(button.as_ref(), width, area.height, self.theme, self.context(index, true));
                blit(&scratch, start, area, buf);
            }
        }

        // Overflow hints on the edges the overlay doesn't cover.
        let sticky = pinned.map(|_| self.view.sticky).unwrap_or_default();
        if self.view.scroll_offset > 0.0 && sticky != StickyPosition::Left {
            buf.set_string(area.x, area.y, SCROLL_LEFT_HINT, self.theme.scroll_hint_style);
        }
        let visible_end = self.view.scroll_offset + self.view.viewport_width;
        if self.view.content_width > visible_end + 0.5 && sticky != StickyPosition::Right {
            buf.set_string(area.right() - 1, area.y, SCROLL_RIGHT_HINT, self.theme.scroll_hint_style);
        }
    }
}

/// Index of the tab drawn at column `x` of the strip, if any.
///
/// The pinned overlay wins over whatever scrolls beneath it.
pub fn tab_at(view: &TabStripView<'_>, buttons: &[Box<dyn StripButton>], x: u16) -> Option<usize> {
    if let Some((index, _)) = view.pinned() {
        let (_, width) = cells(buttons.get(index)?.frame());
        let viewport = view.viewport_width.round() as u16;
        let covered = match view.sticky {
            StickyPosition::Left => x < width,
            StickyPosition::Right => x >= viewport.saturating_sub(width),
            StickyPosition::None => false,
        };
        if covered {
            return Some(index);
        }
    }

    let content_x = x as i32 + view.scroll_offset.round() as i32;
    buttons.iter().position(|b| {
        let (left, width) = cells(b.frame());
        content_x >= left && content_x < left + width as i32
    })
}

/// Frame snapped to whole cells.
fn cells(frame: Frame) -> (i32, u16) {
    (frame.left.round() as i32, frame.width.round().max(0.0) as u16)
}

fn draw_button(
    button: &dyn StripButton,
    width: u16,
    height: u16,
    theme: &Theme,
    ctx: ButtonContext,
) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut scratch = Buffer::empty(area);
    button.render(area, &mut scratch, theme, ctx);
    scratch
}

/// Copy `src` into `area` starting at column `start`, clipping both edges.
fn blit(src: &Buffer, start: i32, area: Rect, dst: &mut Buffer) {
    let height = src.area.height.min(area.height);
    for sx in 0..src.area.width {
        let dx = start + sx as i32;
        if dx < 0 || dx >= area.width as i32 {
            continue;
        }
        for y in 0..height {
            *dst.get_mut(area.x + dx as u16, area.y + y) = src.get(sx, y).clone();
        }
    }
}
