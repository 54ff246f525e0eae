//! Tab button variants.
//!
//! Both variants share [`ButtonState`] for what the controller drives and
//! differ only in how they draw themselves:
//! - `Compact`: one row, favicon and title
//! - `Horizontal`: title row with a close glyph, plus a page-state row

use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::layout::Frame;
use crate::state::{Icon, Tab, TabActivity, TabId};
use crate::strip::{ButtonState, TabButton, TabButtonFactory};
use crate::ui::Theme;

const ELLIPSIS: char = '…';
const CLOSE_GLYPH: &str = "×";
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Per-frame information a button needs to draw itself.
#[derive(Debug, Clone, Copy)]
pub struct ButtonContext {
    pub activity: TabActivity,
    /// Drawn as the pinned overlay rather than in the scrolling row.
    pub pinned: bool,
    pub animation_frame: usize,
}

/// A tab button that can draw itself into a terminal buffer.
pub trait StripButton: TabButton {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, ctx: ButtonContext);
}

/// Which button rendering to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Compact,
    Horizontal,
}

/// Builds boxed buttons of the configured variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonFactory {
    variant: ButtonVariant,
}

impl ButtonFactory {
    pub fn new(variant: ButtonVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> ButtonVariant {
        self.variant
    }
}

impl TabButtonFactory for ButtonFactory {
    type Button = Box<dyn StripButton>;

    fn make_button(&self, tab: &Tab, tag: usize) -> Box<dyn StripButton> {
        let state = ButtonState::new(tab, tag);
        match self.variant {
            ButtonVariant::Compact => Box::new(CompactTabButton { state }),
            ButtonVariant::Horizontal => Box::new(HorizontalTabButton { state }),
        }
    }
}

/// Forward [`TabButton`] to the wrapped `state` field.
macro_rules! delegate_tab_button {
    ($ty:ty) => {
        impl TabButton for $ty {
            fn tab_id(&self) -> TabId {
                self.state.tab_id()
            }

            fn tag(&self) -> usize {
                self.state.tag()
            }

            fn set_tag(&mut self, tag: usize) {
                self.state.set_tag(tag)
            }

            fn is_selected(&self) -> bool {
                self.state.is_selected()
            }

            fn set_selected(&mut self, selected: bool) {
                self.state.set_selected(selected)
            }

            fn title(&self) -> &str {
                self.state.title()
            }

            fn set_title(&mut self, title: &str) {
                self.state.set_title(title)
            }

            fn favicon(&self) -> Option<&Icon> {
                self.state.favicon()
            }

            fn set_favicon(&mut self, icon: Option<Icon>) {
                self.state.set_favicon(icon)
            }

            fn frame(&self) -> Frame {
                self.state.frame()
            }

            fn set_frame(&mut self, frame: Frame) {
                self.state.set_frame(frame)
            }
        }
    };
}

/// Single-row button used by the compact toolbar.
#[derive(Debug, Clone)]
pub struct CompactTabButton {
    state: ButtonState,
}

delegate_tab_button!(CompactTabButton);

impl StripButton for CompactTabButton {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, ctx: ButtonContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = base_style(&self.state, theme, ctx);
        fill(area, buf, style);

        let glyph = leading_glyph(&self.state, ctx);
        let mut x = area.x + 1;
        if area.width > 3 {
            buf.set_string(x, area.y, glyph, style.patch(theme.favicon_style));
            x += glyph.width() as u16 + 1;
        }
        let room = area.right().saturating_sub(x).saturating_sub(1);
        buf.set_string(x, area.y, truncate(&self.state.title, room as usize), style);
    }
}

/// Two-row button with a close glyph and page state.
#[derive(Debug, Clone)]
pub struct HorizontalTabButton {
    state: ButtonState,
}

delegate_tab_button!(HorizontalTabButton);

impl StripButton for HorizontalTabButton {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, ctx: ButtonContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = base_style(&self.state, theme, ctx);
        fill(area, buf, style);

        let glyph = leading_glyph(&self.state, ctx);
        buf.set_string(area.x + 1, area.y, glyph, style.patch(theme.favicon_style));

        let title_x = area.x + 1 + glyph.width() as u16 + 1;
        // Leave room for " ×" at the right edge.
        let room = area.right().saturating_sub(title_x).saturating_sub(3);
        buf.set_string(title_x, area.y, truncate(&self.state.title, room as usize), style);
        if area.width >= 6 {
            buf.set_string(
                area.right() - 2,
                area.y,
                CLOSE_GLYPH,
                style.patch(theme.close_glyph_style),
            );
        }

        if area.height > 1 {
            let (label, state_style) = match ctx.activity {
                TabActivity::Dormant => ("○ dormant", theme.dormant_style),
                TabActivity::Loading => ("◌ loading", theme.loading_style),
                TabActivity::Active => ("● live", theme.active_style),
            };
            let room = area.width.saturating_sub(2) as usize;
            buf.set_string(area.x + 1, area.y + 1, truncate(label, room), style.patch(state_style));
        }
    }
}

fn base_style(state: &ButtonState, theme: &Theme, ctx: ButtonContext) -> Style {
    if ctx.pinned {
        theme.pinned_tab_style
    } else if state.selected {
        theme.selected_tab_style
    } else {
        theme.tab_style
    }
}

fn leading_glyph(state: &ButtonState, ctx: ButtonContext) -> &str {
    if ctx.activity == TabActivity::Loading {
        return SPINNER[ctx.animation_frame % SPINNER.len()];
    }
    state.favicon.as_ref().map_or("·", |icon| icon.0.as_str())
}

fn fill(area: Rect, buf: &mut Buffer, style: Style) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            buf.get_mut(x, y).set_symbol(" ").set_style(style);
        }
    }
}

/// Cut `text` to at most `width` columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}
