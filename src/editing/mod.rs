//! The in-place editing engine: session keys, the view/edit state machine,
//! render selection, and the save pipeline.

pub mod access;
pub mod format;
pub mod key;
pub mod listing;
pub mod mode;
pub mod mutation;
pub mod policy;
pub mod render;
pub mod session;
pub mod store;
pub mod validate;
pub mod widget;
