//! Page resource boundary.
//!
//! The page-rendering engine behind each tab is opaque here. The strip only
//! needs to ask for a resource to be created (without blocking), hear back
//! when it exists, and suspend it again to reclaim memory.

pub mod demo;
pub mod loader;

pub use demo::DemoPageProvider;
pub use loader::ResourceLoader;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::{Icon, TabId};

/// Opaque handle to a live page resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageHandle(pub u64);

/// Configuration captured when a page is suspended.
///
/// Seeds the next creation for the same tab.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Handle the config was taken from.
    pub suspended_from: Option<PageHandle>,
    /// Provider-specific settings.
    #[serde(default)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl ResourceConfig {
    pub fn for_page(handle: PageHandle) -> Self {
        Self {
            suspended_from: Some(handle),
            settings: serde_json::Map::new(),
        }
    }
}

/// Everything a provider needs to build a page for a tab.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub tab_id: TabId,
    pub url: Option<String>,
    pub seed: Option<ResourceConfig>,
}

/// Asynchronous news from the page layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// A requested resource is ready.
    Created { tab_id: TabId, handle: PageHandle },
    /// A requested resource could not be created.
    Failed { tab_id: TabId, error: String },
    /// The page changed its title.
    TitleChanged { tab_id: TabId, title: String },
    /// The page changed its favicon.
    IconChanged { tab_id: TabId, icon: Option<Icon> },
}

/// The page-rendering engine.
pub trait PageResourceProvider: Send + Sync + 'static {
    /// Build a page for the tab. Must be idempotent per tab.
    fn create_resource(&self, request: CreateRequest) -> BoxFuture<'static, Result<PageHandle>>;

    /// Tear down a live page and return a config that can seed a new one.
    fn suspend_resource(&self, handle: PageHandle) -> ResourceConfig;
}

/// Synchronous seam the strip controller talks to.
///
/// `request_create` must return immediately; completion is reported later
/// as a [`ResourceEvent`].
#[cfg_attr(test, mockall::automock)]
pub trait PageResources {
    fn request_create(&self, request: CreateRequest);

    fn suspend(&self, handle: PageHandle) -> ResourceConfig;
}

/// Resources that are never created. Useful for headless strips.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPageResources;

impl PageResources for NoPageResources {
    fn request_create(&self, _request: CreateRequest) {}

    fn suspend(&self, handle: PageHandle) -> ResourceConfig {
        ResourceConfig::for_page(handle)
    }
}
