//! Per-user authorization sessions.

mod model;
mod store;

pub use model::Session;
pub use store::{InMemorySessionStore, SessionStore};
