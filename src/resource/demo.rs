//! Simulated page engine for the terminal front end.
//!
//! Pages "load" after a random delay and then report a title and favicon,
//! which is enough to exercise dormant tabs, loading state and async title
//! updates without a real renderer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;

use super::{CreateRequest, PageHandle, PageResourceProvider, ResourceConfig, ResourceEvent};
use crate::error::Result;
use crate::state::Icon;

/// Sample addresses handed out to new demo tabs.
pub const SAMPLE_URLS: &[&str] = &[
    "https://www.rust-lang.org",
    "https://docs.rs/ratatui",
    "https://crates.io",
    "https://github.com/tokio-rs/tokio",
    "https://news.ycombinator.com",
    "https://en.wikipedia.org/wiki/Tab_(interface)",
    "https://doc.rust-lang.org/book",
    "https://this-week-in-rust.org",
];

/// Fake page engine.
pub struct DemoPageProvider {
    events: mpsc::UnboundedSender<ResourceEvent>,
    latency: Duration,
    next_handle: AtomicU64,
    pages: Mutex<HashMap<PageHandle, Option<String>>>,
}

impl DemoPageProvider {
    pub fn new(events: mpsc::UnboundedSender<ResourceEvent>, latency: Duration) -> Self {
        Self {
            events,
            latency,
            next_handle: AtomicU64::new(1),
            pages: Mutex::new(HashMap::new()),
        }
    }

    /// Number of pages currently alive.
    pub fn live_pages(&self) -> usize {
        self.pages.lock().map(|p| p.len()).unwrap_or(0)
    }

    fn jittered_latency(&self) -> Duration {
        let base = self.latency.as_millis() as u64;
        if base == 0 {
            return Duration::ZERO;
        }
        let mut rng = StdRng::from_entropy();
        Duration::from_millis(rng.gen_range(base / 2..=base + base / 2))
    }
}

/// Title a page would report for `url`.
pub fn title_for(url: Option<&str>) -> String {
    let Some(url) = url else {
        return "New Tab".to_string();
    };
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");
    match trimmed.split_once('/') {
        Some((host, path)) if !path.is_empty() => format!("{host} - {path}"),
        Some((host, _)) => host.to_string(),
        None => trimmed.to_string(),
    }
}

impl PageResourceProvider for DemoPageProvider {
    fn create_resource(&self, request: CreateRequest) -> BoxFuture<'static, Result<PageHandle>> {
        let url = request
            .url
            .clone()
            .or_else(|| {
                request
                    .seed
                    .as_ref()
                    .and_then(|s| s.settings.get("url"))
                    .and_then(|v| v.as_str().map(str::to_string))
            });
        let handle = PageHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut pages) = self.pages.lock() {
            pages.insert(handle, url.clone());
        }

        let events = self.events.clone();
        let delay = self.jittered_latency();
        let tab_id = request.tab_id;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            let title = title_for(url.as_deref());
            let glyph = title.chars().next().map(|c| c.to_ascii_uppercase().to_string());
            let _ = events.send(ResourceEvent::TitleChanged { tab_id, title });
            let _ = events.send(ResourceEvent::IconChanged {
                tab_id,
                icon: glyph.map(Icon),
            });
            Ok(handle)
        })
    }

    fn suspend_resource(&self, handle: PageHandle) -> ResourceConfig {
        let url = self
            .pages
            .lock()
            .ok()
            .and_then(|mut pages| pages.remove(&handle))
            .flatten();

        let mut config = ResourceConfig::for_page(handle);
        if let Some(url) = url {
            config.settings.insert("url".into(), serde_json::Value::String(url));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TabId;
    use pretty_assertions::assert_eq;

    #[test]
    fn titles_from_urls() {
        assert_eq!(title_for(None), "New Tab");
        assert_eq!(title_for(Some("https://crates.io")), "crates.io");
        assert_eq!(title_for(Some("https://www.rust-lang.org/")), "rust-lang.org");
        assert_eq!(title_for(Some("https://docs.rs/ratatui")), "docs.rs - ratatui");
    }

    #[tokio::test]
    async fn suspend_keeps_url_for_the_next_creation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let provider = DemoPageProvider::new(tx, Duration::ZERO);

        let handle = provider
            .create_resource(CreateRequest {
                tab_id: TabId(1),
                url: Some("https://crates.io".into()),
                seed: None,
            })
            .await
            .unwrap();
        assert_eq!(provider.live_pages(), 1);
        assert_eq!(
            rx.recv().await,
            Some(ResourceEvent::TitleChanged {
                tab_id: TabId(1),
                title: "crates.io".into()
            })
        );

        let config = provider.suspend_resource(handle);
        assert_eq!(provider.live_pages(), 0);
        assert_eq!(
            config.settings.get("url").and_then(|v| v.as_str()),
            Some("https://crates.io")
        );
    }
}
