//! Core library for Grove: session store, persistence, responder channel.

pub mod config;
pub mod responder;
pub mod session;
