//! Command handlers.

pub mod config;
pub mod send;
pub mod sessions;
