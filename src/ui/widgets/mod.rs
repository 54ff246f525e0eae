//! Custom widgets for the tab strip TUI.

pub mod tab_button;

pub use tab_button::{
    truncate, ButtonContext, ButtonFactory, ButtonVariant, CompactTabButton, HorizontalTabButton,
    StripButton,
};
