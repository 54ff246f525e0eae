//! Tab strip controller.
//!
//! Orchestrates the collection, the layout engine and the sticky state
//! machine. Every user intent (open, close, select, resize, scroll) enters
//! here, mutates state completely, and only then notifies observers.

pub mod button;
pub mod notification;

pub use button::{ButtonState, HeadlessButtons, TabButton, TabButtonFactory};
pub use notification::{ChannelObserver, Notification, TabStripObserver};

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::{Result, TabStripError};
use crate::layout::{LayoutConfig, LayoutEngine};
use crate::resource::{CreateRequest, PageHandle, PageResources, ResourceConfig, ResourceEvent};
use crate::state::{Icon, Tab, TabActivity, TabCollection, TabId};
use crate::sticky::{StickyController, StickyInputs, StickyPosition};
use notification::NotificationBatch;

/// Selection after removing the tab at `removed`.
///
/// `remaining` is the tab count after the removal. Removing a tab after the
/// selection never moves it; removing at or before it shifts it left so it
/// keeps tracking the same neighbour.
pub fn reindex_selection(removed: usize, selected: Option<usize>, remaining: usize) -> Option<usize> {
    let last = remaining.checked_sub(1)?;
    match selected {
        Some(s) if removed > last && s >= removed => Some(last),
        Some(s) if s >= removed => Some(s.saturating_sub(1)),
        Some(s) => Some(s),
        None => Some(0),
    }
}

/// Read model handed to the rendering layer.
#[derive(Debug, Clone, Copy)]
pub struct TabStripView<'a> {
    pub tabs: &'a [Tab],
    pub selected: Option<usize>,
    pub width_per_tab: f32,
    pub sticky: StickyPosition,
    pub sticky_tab: Option<TabId>,
    /// Always `0` while `scrolling_enabled` is false.
    pub scroll_offset: f32,
    pub viewport_width: f32,
    pub content_width: f32,
    pub scrolling_enabled: bool,
}

impl<'a> TabStripView<'a> {
    /// Resolve the pinned tab by id. The overlay never owns its tab.
    pub fn pinned(&self) -> Option<(usize, &'a Tab)> {
        let id = self.sticky_tab?;
        self.tabs.iter().enumerate().find(|(_, t)| t.id() == id)
    }
}

/// Creation outcome for a tab whose collection is swapped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParkedCreation {
    InFlight,
    Created(PageHandle),
    Failed,
}

/// The tab strip.
pub struct TabStripController<F: TabButtonFactory, R: PageResources> {
    collection: TabCollection,
    buttons: Vec<F::Button>,
    factory: F,
    resources: R,
    layout: LayoutEngine,
    sticky: StickyController,
    sticky_tab: Option<TabId>,
    viewport_width: f32,
    scroll_offset: f32,
    observers: Vec<Box<dyn TabStripObserver>>,
    parked: HashMap<TabId, ParkedCreation>,
}

impl<F: TabButtonFactory, R: PageResources> TabStripController<F, R> {
    /// Create an empty strip.
    pub fn new(factory: F, resources: R, layout: LayoutConfig) -> Self {
        Self {
            collection: TabCollection::new(),
            buttons: Vec::new(),
            factory,
            resources,
            layout: LayoutEngine::new(layout),
            sticky: StickyController::new(),
            sticky_tab: None,
            viewport_width: 0.0,
            scroll_offset: 0.0,
            observers: Vec::new(),
            parked: HashMap::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn TabStripObserver>) {
        self.observers.push(observer);
    }

    pub fn collection(&self) -> &TabCollection {
        &self.collection
    }

    pub fn buttons(&self) -> &[F::Button] {
        &self.buttons
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.collection.selected_index()
    }

    pub fn sticky_position(&self) -> StickyPosition {
        self.sticky.position()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn view(&self) -> TabStripView<'_> {
        let count = self.collection.len();
        TabStripView {
            tabs: self.collection.tabs(),
            selected: self.collection.selected_index(),
            width_per_tab: self.layout.width_per_tab(),
            sticky: self.sticky.position(),
            sticky_tab: self.sticky_tab,
            scroll_offset: self.scroll_offset,
            viewport_width: self.viewport_width,
            content_width: self.layout.content_width(count),
            scrolling_enabled: self.layout.scrolling_enabled(),
        }
    }

    /// Open a tab at the end of the strip and select it.
    pub fn add_tab(&mut self, tab: Tab) -> Result<usize> {
        let mut batch = NotificationBatch::new();
        let id = tab.id();
        let new_index = self.collection.append(tab)?;
        self.push_button(new_index);

        let previous = self.collection.selected_index();
        self.collection.select(Some(new_index))?;
        self.mark_selected(previous, new_index);
        self.materialize(new_index);

        info!(%id, index = new_index, count = self.collection.len(), "tab added");
        batch.push(Notification::TabAdded { index: new_index, id });
        batch.push(Notification::SelectionChanged {
            from: previous,
            to: Some(new_index),
        });
        self.relayout(&mut batch);
        self.clear_sticky(&mut batch);
        self.request_scroll(new_index, &mut batch);
        self.dispatch(batch);
        Ok(new_index)
    }

    /// Append a tab without switching to it, e.g. while restoring a session.
    ///
    /// The tab stays dormant. An empty strip selects its first tab.
    pub fn add_tab_in_background(&mut self, tab: Tab) -> Result<usize> {
        let mut batch = NotificationBatch::new();
        let id = tab.id();
        let index = self.collection.append(tab)?;
        self.push_button(index);
        batch.push(Notification::TabAdded { index, id });

        if self.collection.selected_index().is_none() {
            self.collection.select(Some(index))?;
            self.mark_selected(None, index);
            self.materialize(index);
            batch.push(Notification::SelectionChanged { from: None, to: Some(index) });
        }

        debug!(%id, index, "tab added in background");
        self.relayout(&mut batch);
        self.refresh_sticky(&mut batch);
        self.dispatch(batch);
        Ok(index)
    }

    /// Close the tab at `index`.
    pub fn remove_tab(&mut self, index: usize) -> Result<Tab> {
        let previous = self.collection.selected_index();
        let removed = self.collection.remove(index)?;
        self.buttons.remove(index);
        for (tag, button) in self.buttons.iter_mut().enumerate().skip(index) {
            button.set_tag(tag);
        }

        let selected = reindex_selection(index, previous, self.collection.len());
        self.collection.select(selected)?;
        for (i, button) in self.buttons.iter_mut().enumerate() {
            button.set_selected(Some(i) == selected);
        }
        if let Some(s) = selected {
            self.materialize(s);
        }

        info!(
            id = %removed.id(),
            index,
            count = self.collection.len(),
            selected = ?selected,
            "tab removed"
        );

        let mut batch = NotificationBatch::new();
        batch.push(Notification::TabRemoved {
            index,
            id: removed.id(),
        });
        if previous != selected || previous == Some(index) {
            batch.push(Notification::SelectionChanged {
                from: previous,
                to: selected,
            });
        }
        self.relayout(&mut batch);
        self.clear_sticky(&mut batch);
        if let Some(s) = selected {
            self.request_scroll(s, &mut batch);
        }
        self.dispatch(batch);
        Ok(removed)
    }

    /// Switch to the tab at `index`.
    ///
    /// Stale indices (the tab was closed meanwhile) are ignored and yield
    /// `Ok(false)`. Selecting in an empty strip is an error.
    pub fn select_tab(&mut self, index: usize) -> Result<bool> {
        if self.collection.is_empty() {
            return Err(TabStripError::EmptyCollectionSelection);
        }
        if index >= self.collection.len() {
            debug!(index, count = self.collection.len(), "ignoring stale selection");
            return Ok(false);
        }

        let previous = self.collection.selected_index();
        self.collection.select(Some(index))?;
        self.mark_selected(previous, index);
        self.materialize(index);

        let mut batch = NotificationBatch::new();
        if previous != Some(index) {
            batch.push(Notification::SelectionChanged {
                from: previous,
                to: Some(index),
            });
        }
        self.clear_sticky(&mut batch);
        self.request_scroll(index, &mut batch);
        self.dispatch(batch);
        Ok(true)
    }

    /// Select the tab to the right, wrapping around.
    pub fn select_next(&mut self) -> Result<bool> {
        let count = self.collection.len();
        let next = self.collection.selected_index().map_or(0, |s| (s + 1) % count.max(1));
        self.select_tab(next)
    }

    /// Select the tab to the left, wrapping around.
    pub fn select_previous(&mut self) -> Result<bool> {
        let count = self.collection.len();
        let prev = match self.collection.selected_index() {
            Some(0) | None => count.saturating_sub(1),
            Some(s) => s - 1,
        };
        self.select_tab(prev)
    }

    /// Replace the whole collection, e.g. on a workspace switch.
    ///
    /// Buttons are rebuilt and selection, layout and sticky state are derived
    /// from scratch. Returns the previous collection.
    pub fn swap_collection(&mut self, collection: TabCollection) -> TabCollection {
        let previous_selected = self.collection.selected_index();
        let old = std::mem::replace(&mut self.collection, collection);
        for tab in old.iter().filter(|t| t.activity() == TabActivity::Loading) {
            self.parked.insert(tab.id(), ParkedCreation::InFlight);
        }
        self.settle_parked();

        if self.collection.selected_index().is_none() && !self.collection.is_empty() {
            // Append-built collections may not carry a selection yet.
            let _ = self.collection.select(Some(0));
        }
        let selected = self.collection.selected_index();

        self.buttons = self
            .collection
            .iter()
            .enumerate()
            .map(|(i, tab)| self.factory.make_button(tab, i))
            .collect();
        if let Some(s) = selected {
            if let Some(button) = self.buttons.get_mut(s) {
                button.set_selected(true);
            }
            self.materialize(s);
        }

        info!(count = self.collection.len(), selected = ?selected, "tab collection swapped");

        let mut batch = NotificationBatch::new();
        batch.push(Notification::CollectionSwapped {
            tab_count: self.collection.len(),
        });
        batch.push(Notification::SelectionChanged {
            from: previous_selected,
            to: selected,
        });
        self.scroll_offset = 0.0;
        self.layout.invalidate();
        self.relayout(&mut batch);
        self.clear_sticky(&mut batch);
        if let Some(s) = selected {
            self.request_scroll(s, &mut batch);
        }
        self.dispatch(batch);
        old
    }

    /// The viewport changed width.
    pub fn viewport_resized(&mut self, width: f32) {
        let width = width.max(0.0);
        if width == self.viewport_width {
            return;
        }
        self.viewport_width = width;

        let mut batch = NotificationBatch::new();
        self.relayout(&mut batch);
        self.refresh_sticky(&mut batch);
        self.dispatch(batch);
    }

    /// The strip was scrolled to `offset`.
    ///
    /// Offsets are clamped to the scrollable range, which is empty while
    /// scrolling is disabled.
    pub fn scrolled(&mut self, offset: f32) {
        self.scroll_offset = offset.clamp(0.0, self.max_scroll());

        let mut batch = NotificationBatch::new();
        self.refresh_sticky(&mut batch);
        self.dispatch(batch);
    }

    /// Scroll by `delta`.
    pub fn scroll_by(&mut self, delta: f32) {
        self.scrolled(self.scroll_offset + delta);
    }

    /// A page reported a new title. Returns `false` for unknown tabs.
    pub fn set_title(&mut self, id: TabId, title: impl Into<String>) -> bool {
        let Some(index) = self.collection.position(id) else {
            debug!(%id, "title update for a closed tab");
            return false;
        };
        let title = title.into();
        if let Some(tab) = self.collection.get_mut(index) {
            tab.title = title.clone();
        }
        if let Some(button) = self.buttons.get_mut(index) {
            button.set_title(&title);
        }

        let mut batch = NotificationBatch::new();
        batch.push(Notification::TabUpdated { index, id });
        if self.collection.selected_index() == Some(index) {
            batch.push(Notification::ActiveTitleChanged { title });
        }
        self.dispatch(batch);
        true
    }

    /// A page reported a new favicon. Returns `false` for unknown tabs.
    pub fn set_icon(&mut self, id: TabId, icon: Option<Icon>) -> bool {
        let Some(index) = self.collection.position(id) else {
            debug!(%id, "icon update for a closed tab");
            return false;
        };
        if let Some(tab) = self.collection.get_mut(index) {
            tab.icon = icon.clone();
        }
        if let Some(button) = self.buttons.get_mut(index) {
            button.set_favicon(icon);
        }

        let mut batch = NotificationBatch::new();
        batch.push(Notification::TabUpdated { index, id });
        self.dispatch(batch);
        true
    }

    /// A requested page resource is ready.
    ///
    /// Only a loading tab accepts the page. Pages for parked tabs are kept
    /// until their collection returns; any other page is suspended.
    pub fn resource_created(&mut self, id: TabId, handle: PageHandle) -> bool {
        let Some(index) = self.collection.position(id) else {
            if let Some(parked) = self.parked.get_mut(&id) {
                if *parked == ParkedCreation::InFlight {
                    debug!(%id, ?handle, "holding page for a parked tab");
                    *parked = ParkedCreation::Created(handle);
                    return false;
                }
            }
            debug!(%id, ?handle, "discarding page for a closed tab");
            self.resources.suspend(handle);
            return false;
        };
        let accepted = match self.collection.get_mut(index) {
            Some(tab) if tab.activity() == TabActivity::Loading => {
                tab.attach_page(handle);
                true
            }
            _ => false,
        };
        if !accepted {
            debug!(%id, ?handle, "discarding page for a tab that is not loading");
            self.resources.suspend(handle);
            return false;
        }

        let mut batch = NotificationBatch::new();
        batch.push(Notification::TabUpdated { index, id });
        self.dispatch(batch);
        true
    }

    /// A requested page resource failed; the next selection may retry.
    pub fn resource_failed(&mut self, id: TabId, error: &str) {
        warn!(%id, error, "page resource failed");
        if let Some(tab) = self.collection.find_mut(id) {
            tab.abort_materialize();
        } else if let Some(parked) = self.parked.get_mut(&id) {
            *parked = ParkedCreation::Failed;
        }
    }

    /// Route an event coming back from the page layer.
    pub fn handle_resource_event(&mut self, event: ResourceEvent) {
        match event {
            ResourceEvent::Created { tab_id, handle } => {
                self.resource_created(tab_id, handle);
            }
            ResourceEvent::Failed { tab_id, error } => self.resource_failed(tab_id, &error),
            ResourceEvent::TitleChanged { tab_id, title } => {
                self.set_title(tab_id, title);
            }
            ResourceEvent::IconChanged { tab_id, icon } => {
                self.set_icon(tab_id, icon);
            }
        }
    }

    /// Suspend the live page of the tab at `index` to reclaim memory.
    ///
    /// The tab turns dormant and keeps the returned config to seed its next
    /// page, unless it already holds one.
    pub fn deactivate_tab(&mut self, index: usize) -> Result<Option<ResourceConfig>> {
        let len = self.collection.len();
        let tab = self
            .collection
            .get_mut(index)
            .ok_or(TabStripError::IndexOutOfRange { index, len })?;
        let Some(handle) = tab.detach_page() else {
            return Ok(None);
        };

        let config = self.resources.suspend(handle);
        tab.keep_resource_config(config.clone());
        let id = tab.id();
        info!(%id, index, "tab deactivated");

        let mut batch = NotificationBatch::new();
        batch.push(Notification::TabUpdated { index, id });
        self.dispatch(batch);
        Ok(Some(config))
    }

    fn push_button(&mut self, index: usize) {
        if let Some(tab) = self.collection.get(index) {
            let button = self.factory.make_button(tab, index);
            self.buttons.push(button);
        }
    }

    fn mark_selected(&mut self, previous: Option<usize>, index: usize) {
        if let Some(button) = previous.and_then(|p| self.buttons.get_mut(p)) {
            button.set_selected(false);
        }
        if let Some(button) = self.buttons.get_mut(index) {
            button.set_selected(true);
        }
    }

    /// Request the page for a dormant tab, at most once while in flight.
    fn materialize(&mut self, index: usize) {
        let Some(tab) = self.collection.get_mut(index) else {
            return;
        };
        if !tab.begin_materialize() {
            return;
        }
        let request = CreateRequest {
            tab_id: tab.id(),
            url: tab.url.clone(),
            seed: tab.resource_config().cloned(),
        };
        self.resources.request_create(request);
    }

    /// Apply outcomes recorded while the incoming tabs were parked.
    fn settle_parked(&mut self) {
        for i in 0..self.collection.len() {
            let Some(tab) = self.collection.get_mut(i) else {
                continue;
            };
            let Some(outcome) = self.parked.remove(&tab.id()) else {
                continue;
            };
            match outcome {
                ParkedCreation::InFlight => {}
                ParkedCreation::Created(handle) if tab.activity() == TabActivity::Loading => {
                    tab.attach_page(handle);
                }
                ParkedCreation::Created(handle) => {
                    self.resources.suspend(handle);
                }
                ParkedCreation::Failed => tab.abort_materialize(),
            }
        }
    }

    fn max_scroll(&self) -> f32 {
        if !self.layout.scrolling_enabled() {
            return 0.0;
        }
        self.layout.max_scroll(self.viewport_width, self.collection.len())
    }

    fn relayout(&mut self, batch: &mut NotificationBatch) {
        let count = self.collection.len();
        if let Some(snapshot) = self.layout.update(self.viewport_width, count) {
            batch.push(Notification::LayoutChanged(snapshot));
        }
        for (i, button) in self.buttons.iter_mut().enumerate() {
            button.set_frame(self.layout.frame_for(i));
        }
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    fn refresh_sticky(&mut self, batch: &mut NotificationBatch) {
        let Some(selected) = self.collection.selected_index() else {
            return;
        };
        let Some(button) = self.buttons.get(selected) else {
            return;
        };
        let inputs = StickyInputs {
            scroll_offset: self.scroll_offset,
            viewport_width: self.viewport_width,
            content_width: self.layout.content_width(self.collection.len()),
            selected: button.frame(),
        };
        let tab_id = button.tab_id();
        if let Some(transition) = self.sticky.evaluate(inputs, self.layout.is_saturated()) {
            self.sticky_tab = (transition.to != StickyPosition::None).then_some(tab_id);
            batch.push(Notification::StickyChanged {
                transition,
                tab: self.sticky_tab,
            });
        }
    }

    fn clear_sticky(&mut self, batch: &mut NotificationBatch) {
        self.sticky_tab = None;
        if let Some(transition) = self.sticky.reset() {
            batch.push(Notification::StickyChanged {
                transition,
                tab: None,
            });
        }
    }

    fn request_scroll(&mut self, index: usize, batch: &mut NotificationBatch) {
        let offset = if self.layout.scrolling_enabled() {
            self.layout
                .scroll_target(index, self.viewport_width, self.collection.len())
        } else {
            0.0
        };
        batch.push(Notification::ScrollRequested { index, offset });
    }

    fn dispatch(&mut self, batch: NotificationBatch) {
        for notification in batch.finish() {
            for observer in self.observers.iter_mut() {
                observer.notify(&notification);
            }
        }
    }
}
