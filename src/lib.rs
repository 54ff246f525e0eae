//! Tab strip engine
//!
//! Tab lifecycle, selection, uniform-width layout and sticky pinning for a
//! browser-style tab bar, plus a terminal front end that drives it.

pub mod app;
pub mod error;
pub mod event;
pub mod layout;
pub mod resource;
pub mod state;
pub mod sticky;
pub mod strip;
pub mod ui;

pub use error::{Result, TabStripError};
pub use strip::{Notification, TabStripController, TabStripView};
