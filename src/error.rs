//! Error types for the tab strip core.

use thiserror::Error;

use crate::state::TabId;

/// Errors raised by index-based operations on the tab strip.
///
/// None of these are fatal to the process; they reject the triggering call
/// and leave the collection exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabStripError {
    /// An index outside `0..len` was used.
    #[error("tab index {index} out of range (tab count: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A selection was requested while the collection holds no tabs.
    #[error("cannot select a tab in an empty collection")]
    EmptyCollectionSelection,

    /// "No selection" was requested while tabs are present.
    #[error("a non-empty collection must keep a selected tab")]
    SelectionRequired,

    /// The tab id is already present in the collection.
    #[error("duplicate tab id {0}")]
    DuplicateTabId(TabId),

    /// The page resource provider failed.
    #[error("page resource error: {0}")]
    Resource(String),
}

pub type Result<T> = std::result::Result<T, TabStripError>;
