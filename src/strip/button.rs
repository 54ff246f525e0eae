//! Tab button capability.
//!
//! The controller drives buttons only through [`TabButton`], so compact and
//! horizontal renderings (or a headless stand-in) are interchangeable.

use crate::layout::Frame;
use crate::state::{Icon, Tab, TabId};

/// What the controller needs from a rendered tab button.
pub trait TabButton {
    /// Tab this button shows.
    fn tab_id(&self) -> TabId;

    /// Current display index.
    fn tag(&self) -> usize;

    fn set_tag(&mut self, tag: usize);

    fn is_selected(&self) -> bool;

    fn set_selected(&mut self, selected: bool);

    fn title(&self) -> &str;

    fn set_title(&mut self, title: &str);

    fn favicon(&self) -> Option<&Icon>;

    fn set_favicon(&mut self, icon: Option<Icon>);

    /// Geometry inside the scrollable content.
    fn frame(&self) -> Frame;

    fn set_frame(&mut self, frame: Frame);
}

impl<B: TabButton + ?Sized> TabButton for Box<B> {
    fn tab_id(&self) -> TabId {
        (**self).tab_id()
    }

    fn tag(&self) -> usize {
        (**self).tag()
    }

    fn set_tag(&mut self, tag: usize) {
        (**self).set_tag(tag)
    }

    fn is_selected(&self) -> bool {
        (**self).is_selected()
    }

    fn set_selected(&mut self, selected: bool) {
        (**self).set_selected(selected)
    }

    fn title(&self) -> &str {
        (**self).title()
    }

    fn set_title(&mut self, title: &str) {
        (**self).set_title(title)
    }

    fn favicon(&self) -> Option<&Icon> {
        (**self).favicon()
    }

    fn set_favicon(&mut self, icon: Option<Icon>) {
        (**self).set_favicon(icon)
    }

    fn frame(&self) -> Frame {
        (**self).frame()
    }

    fn set_frame(&mut self, frame: Frame) {
        (**self).set_frame(frame)
    }
}

/// Builds a button for a tab at a given display index.
pub trait TabButtonFactory {
    type Button: TabButton;

    fn make_button(&self, tab: &Tab, tag: usize) -> Self::Button;
}

/// Shared button state. Rendering variants wrap this.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonState {
    pub tab_id: TabId,
    pub tag: usize,
    pub selected: bool,
    pub title: String,
    pub favicon: Option<Icon>,
    pub frame: Frame,
}

impl ButtonState {
    pub fn new(tab: &Tab, tag: usize) -> Self {
        Self {
            tab_id: tab.id(),
            tag,
            selected: false,
            title: tab.title.clone(),
            favicon: tab.icon.clone(),
            frame: Frame::default(),
        }
    }
}

impl TabButton for ButtonState {
    fn tab_id(&self) -> TabId {
        self.tab_id
    }

    fn tag(&self) -> usize {
        self.tag
    }

    fn set_tag(&mut self, tag: usize) {
        self.tag = tag;
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn favicon(&self) -> Option<&Icon> {
        self.favicon.as_ref()
    }

    fn set_favicon(&mut self, icon: Option<Icon>) {
        self.favicon = icon;
    }

    fn frame(&self) -> Frame {
        self.frame
    }

    fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }
}

/// Factory for headless strips: buttons are bare [`ButtonState`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessButtons;

impl TabButtonFactory for HeadlessButtons {
    type Button = ButtonState;

    fn make_button(&self, tab: &Tab, tag: usize) -> ButtonState {
        ButtonState::new(tab, tag)
    }
}
