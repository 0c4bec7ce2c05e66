pub mod auth;
pub mod display;
pub mod field;
pub mod record;
pub mod revision;
pub mod types;
