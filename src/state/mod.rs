//! Tab strip data model.
//!
//! This module holds the plain data the strip renders from: the tab entity
//! and the ordered collection with its selection pointer. It knows nothing
//! about buttons, widths or scrolling.

mod collection;
mod tab;

pub use collection::TabCollection;
pub use tab::{Icon, Tab, TabActivity, TabId, TabIdGenerator, DEFAULT_TITLE};
