//! Session management: data model, durable storage, and the session store.

mod model;
mod storage;
mod store;

pub use model::{
    Message, Role, Session, SessionSummary, TITLE_PLACEHOLDER, derive_title,
    format_timestamp_relative,
};
pub use storage::{DisplayMode, SessionCollection, Storage};
pub use store::SessionStore;
