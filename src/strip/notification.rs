//! Notifications emitted by the tab strip controller.
//!
//! A controller operation finishes all of its mutations before anything is
//! sent. Within one operation notifications go out grouped: structural
//! changes, then selection, layout, sticky, scroll requests, and finally
//! per-tab content updates.

use tokio::sync::mpsc;

use crate::layout::LayoutSnapshot;
use crate::sticky::StickyTransition;
use crate::state::TabId;

/// Something the rendering layer should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A tab was appended at `index`.
    TabAdded { index: usize, id: TabId },
    /// The tab at `index` was closed; later tabs shifted left by one.
    TabRemoved { index: usize, id: TabId },
    /// The whole collection was replaced.
    CollectionSwapped { tab_count: usize },
    /// Selection moved. `None` means no selection.
    SelectionChanged { from: Option<usize>, to: Option<usize> },
    /// Tab widths or content extent changed.
    LayoutChanged(LayoutSnapshot),
    /// The pinned overlay changed. `tab` is the pinned tab, if any.
    StickyChanged { transition: StickyTransition, tab: Option<TabId> },
    /// The strip should scroll so the tab at `index` is visible.
    ScrollRequested { index: usize, offset: f32 },
    /// Title, icon or page state of a tab changed.
    TabUpdated { index: usize, id: TabId },
    /// The selected tab reported a new title.
    ActiveTitleChanged { title: String },
}

impl Notification {
    fn rank(&self) -> u8 {
        match self {
            Notification::TabAdded { .. }
            | Notification::TabRemoved { .. }
            | Notification::CollectionSwapped { .. } => 0,
            Notification::SelectionChanged { .. } => 1,
            Notification::LayoutChanged(_) => 2,
            Notification::StickyChanged { .. } => 3,
            Notification::ScrollRequested { .. } => 4,
            Notification::TabUpdated { .. } | Notification::ActiveTitleChanged { .. } => 5,
        }
    }
}

/// Receives controller notifications.
#[cfg_attr(test, mockall::automock)]
pub trait TabStripObserver {
    fn notify(&mut self, notification: &Notification);
}

/// Forwards notifications into a tokio channel.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    /// Observer plus the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl TabStripObserver for ChannelObserver {
    fn notify(&mut self, notification: &Notification) {
        // A dropped receiver just means nobody is rendering any more.
        let _ = self.tx.send(notification.clone());
    }
}

/// Notifications collected during one controller operation.
#[derive(Debug, Default)]
pub(crate) struct NotificationBatch {
    items: Vec<Notification>,
}

impl NotificationBatch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Notifications in delivery order. Stable within a group.
    pub(crate) fn finish(mut self) -> Vec<Notification> {
        self.items.sort_by_key(Notification::rank);
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sticky::StickyPosition;
    use pretty_assertions::assert_eq;

    #[test]
    fn batch_orders_by_group() {
        let mut batch = NotificationBatch::new();
        batch.push(Notification::ScrollRequested { index: 1, offset: 0.0 });
        batch.push(Notification::StickyChanged {
            transition: StickyTransition {
                from: StickyPosition::Left,
                to: StickyPosition::None,
            },
            tab: None,
        });
        batch.push(Notification::SelectionChanged { from: Some(0), to: Some(1) });
        batch.push(Notification::TabAdded { index: 1, id: TabId(2) });

        let kinds: Vec<u8> = batch.finish().iter().map(Notification::rank).collect();
        assert_eq!(kinds, vec![0, 1, 3, 4]);
    }

    #[test]
    fn channel_observer_forwards() {
        let (mut observer, mut rx) = ChannelObserver::channel();
        observer.notify(&Notification::CollectionSwapped { tab_count: 2 });
        assert_eq!(rx.try_recv().unwrap(), Notification::CollectionSwapped { tab_count: 2 });
    }
}
