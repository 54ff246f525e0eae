//! Background materialization of page resources.
//!
//! Creation requests run on tokio tasks and report back over a channel that
//! the event loop drains.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{CreateRequest, PageHandle, PageResourceProvider, PageResources, ResourceConfig, ResourceEvent};

/// Runs provider creations off the UI thread.
pub struct ResourceLoader<P> {
    provider: Arc<P>,
    events: mpsc::UnboundedSender<ResourceEvent>,
    runtime: Handle,
    shutdown: CancellationToken,
}

impl<P: PageResourceProvider> ResourceLoader<P> {
    /// Create a loader that reports on `events`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(provider: Arc<P>, events: mpsc::UnboundedSender<ResourceEvent>) -> Self {
        Self {
            provider,
            events,
            runtime: Handle::current(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Abandon outstanding creations. Their results are never delivered.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl<P: PageResourceProvider> PageResources for ResourceLoader<P> {
    fn request_create(&self, request: CreateRequest) {
        let tab_id = request.tab_id;
        let creation = self.provider.create_resource(request);
        let events = self.events.clone();
        let shutdown = self.shutdown.clone();

        debug!(%tab_id, "materializing page");
        self.runtime.spawn(async move {
            let event = tokio::select! {
                _ = shutdown.cancelled() => return,
                result = creation => match result {
                    Ok(handle) => ResourceEvent::Created { tab_id, handle },
                    Err(err) => {
                        warn!(%tab_id, %err, "page creation failed");
                        ResourceEvent::Failed { tab_id, error: err.to_string() }
                    }
                },
            };
            // Receiver gone means the strip is shutting down.
            let _ = events.send(event);
        });
    }

    fn suspend(&self, handle: PageHandle) -> ResourceConfig {
        self.provider.suspend_resource(handle)
    }
}

impl<P> Drop for ResourceLoader<P> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabStripError;
    use crate::state::TabId;
    use futures::future::BoxFuture;
    use pretty_assertions::assert_eq;

    struct FixedProvider {
        fail: bool,
    }

    impl PageResourceProvider for FixedProvider {
        fn create_resource(&self, request: CreateRequest) -> BoxFuture<'static, crate::error::Result<PageHandle>> {
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    Err(TabStripError::Resource("boom".into()))
                } else {
                    Ok(PageHandle(request.tab_id.0 * 10))
                }
            })
        }

        fn suspend_resource(&self, handle: PageHandle) -> ResourceConfig {
            ResourceConfig::for_page(handle)
        }
    }

    fn request(id: u64) -> CreateRequest {
        CreateRequest {
            tab_id: TabId(id),
            url: None,
            seed: None,
        }
    }

    #[tokio::test]
    async fn completion_is_delivered_as_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = ResourceLoader::new(Arc::new(FixedProvider { fail: false }), tx);

        loader.request_create(request(4));
        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            ResourceEvent::Created {
                tab_id: TabId(4),
                handle: PageHandle(40)
            }
        );
    }

    #[tokio::test]
    async fn failures_are_reported() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = ResourceLoader::new(Arc::new(FixedProvider { fail: true }), tx);

        loader.request_create(request(1));
        match rx.recv().await.unwrap() {
            ResourceEvent::Failed { tab_id, .. } => assert_eq!(tab_id, TabId(1)),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn suspend_goes_to_provider() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let loader = ResourceLoader::new(Arc::new(FixedProvider { fail: false }), tx);
        assert_eq!(loader.suspend(PageHandle(9)), ResourceConfig::for_page(PageHandle(9)));
    }
}
