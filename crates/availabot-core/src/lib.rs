//! # availabot-core
//!
//! Core logic of the availabot calendar assistant.
//!
//! This crate provides:
//! - **Session cache** - per-user CSRF token and calendar credential under one reader/writer lock
//! - **Auth state codec** - the OAuth `state` value carried through the provider redirect
//! - **Authorization flow** - starting flows, validating redirects, storing credentials
//! - **Evening availability** - the next three free evenings from calendar busy data
//! - **Assistant** - turning an inbound message into a reply

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod assistant;
pub mod auth;
pub mod availability;
pub mod config;
mod error;
pub mod session;

pub use assistant::{Assistant, Reply};
pub use auth::{
    AuthFlowController, AuthState, AuthorizationProvider, CallbackOutcome, RedirectCallback,
};
pub use availability::{BusyCalendar, BusyInterval, QueryWindow, compute_free_evenings};
pub use config::OAuthSettings;
pub use error::{Error, Result};
pub use session::{InMemorySessionStore, Session, SessionStore};
