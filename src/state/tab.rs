//! Tab entity.
//!
//! A tab is one open page. Its page resource is materialized lazily, so a
//! tab restored from a saved session starts out dormant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::{PageHandle, ResourceConfig};

/// Title shown until the page reports its own.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Stable tab identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out tab ids that are unique for the lifetime of the generator.
#[derive(Debug, Clone)]
pub struct TabIdGenerator {
    next: u64,
}

impl TabIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next identifier.
    pub fn allocate(&mut self) -> TabId {
        let id = TabId(self.next);
        self.next += 1;
        id
    }
}

impl Default for TabIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference to a favicon. The renderer decides how to draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon(pub String);

/// Whether the tab has live page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabActivity {
    /// No page resource and none requested.
    Dormant,
    /// Creation requested, not yet completed.
    Loading,
    /// Page resource is live.
    Active,
}

/// Data record for one open page.
#[derive(Debug, Clone)]
pub struct Tab {
    id: TabId,
    /// Display title, updated asynchronously by the page.
    pub title: String,
    /// Optional favicon.
    pub icon: Option<Icon>,
    /// Address the tab was opened with.
    pub url: Option<String>,
    /// When the tab was opened.
    pub opened_at: DateTime<Utc>,
    page: Option<PageHandle>,
    resource_config: Option<ResourceConfig>,
    pending: bool,
}

impl Tab {
    /// Create a dormant tab.
    pub fn new(id: TabId) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            icon: None,
            url: None,
            opened_at: Utc::now(),
            page: None,
            resource_config: None,
            pending: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn page(&self) -> Option<PageHandle> {
        self.page
    }

    pub fn resource_config(&self) -> Option<&ResourceConfig> {
        self.resource_config.as_ref()
    }

    pub fn activity(&self) -> TabActivity {
        match (self.page, self.pending) {
            (Some(_), _) => TabActivity::Active,
            (None, true) => TabActivity::Loading,
            (None, false) => TabActivity::Dormant,
        }
    }

    pub fn is_active(&self) -> bool {
        self.page.is_some()
    }

    pub fn is_dormant(&self) -> bool {
        self.activity() == TabActivity::Dormant
    }

    /// Mark a creation request as in flight.
    ///
    /// Returns `false` when the tab is already live or a request is pending,
    /// in which case no new request may be issued.
    pub(crate) fn begin_materialize(&mut self) -> bool {
        if self.page.is_some() || self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Attach the created page resource.
    pub(crate) fn attach_page(&mut self, handle: PageHandle) {
        self.page = Some(handle);
        self.pending = false;
    }

    /// Clear a failed creation so the next selection can retry.
    pub(crate) fn abort_materialize(&mut self) {
        self.pending = false;
    }

    /// Detach the live page resource, leaving the tab dormant.
    ///
    /// A creation still in flight is left alone; only its completion or
    /// failure settles it.
    pub(crate) fn detach_page(&mut self) -> Option<PageHandle> {
        self.page.take()
    }

    /// Keep the suspend config unless one is already stored.
    pub(crate) fn keep_resource_config(&mut self, config: ResourceConfig) {
        if self.resource_config.is_none() {
            self.resource_config = Some(config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_tab_is_dormant_and_untitled() {
        let tab = Tab::new(TabId(7));
        assert_eq!(tab.title, DEFAULT_TITLE);
        assert_eq!(tab.activity(), TabActivity::Dormant);
        assert!(tab.page().is_none());
    }

    #[test]
    fn only_one_materialization_in_flight() {
        let mut tab = Tab::new(TabId(1));
        assert!(tab.begin_materialize());
        assert!(!tab.begin_materialize());
        assert_eq!(tab.activity(), TabActivity::Loading);

        tab.attach_page(PageHandle(3));
        assert!(!tab.begin_materialize());
        assert_eq!(tab.activity(), TabActivity::Active);
    }

    #[test]
    fn detaching_a_loading_tab_keeps_it_in_flight() {
        let mut tab = Tab::new(TabId(1));
        assert!(tab.begin_materialize());
        assert_eq!(tab.detach_page(), None);
        assert_eq!(tab.activity(), TabActivity::Loading);
        assert!(!tab.begin_materialize());
    }

    #[test]
    fn first_suspend_config_wins() {
        let mut tab = Tab::new(TabId(1));
        tab.keep_resource_config(ResourceConfig::for_page(PageHandle(1)));
        tab.keep_resource_config(ResourceConfig::for_page(PageHandle(2)));
        assert_eq!(tab.resource_config(), Some(&ResourceConfig::for_page(PageHandle(1))));
    }

    #[test]
    fn generator_ids_are_unique() {
        let mut ids = TabIdGenerator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
    }
}
