//! Database models backing the repository layer.

pub mod config;
pub mod metadata;
pub mod record;
pub mod revision;
