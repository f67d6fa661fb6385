//! # availabot-oauth
//!
//! `OAuth2` authorization-code plumbing for the availabot calendar assistant.
//!
//! ## Features
//!
//! - **Authorization Code Flow**: authorization URL construction and code exchange
//! - **Credentials**: access tokens with expiry, behind the [`Credential`] capability
//! - **Provider configurations**: pre-configured for Google Calendar (read-only)
//! - **CSRF tokens**: unpredictable per-flow tokens from the OS random source
//!
//! ## Quick Start
//!
//! ```ignore
//! use availabot_oauth::{AuthorizationCodeFlow, OAuthClient, Provider, csrf};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::google_calendar()?;
//!     let client = OAuthClient::new("your_client_id", provider)
//!         .with_client_secret("your_secret")
//!         .with_redirect_uri("http://localhost:8081/oauth2");
//!
//!     let flow = AuthorizationCodeFlow::new(client);
//!     let state = csrf::generate_token();
//!     let auth_url = flow.authorization_url(None, Some(&state))?;
//!     println!("Visit: {auth_url}");
//!
//!     // After the user authorizes, the redirect carries `code` and `state`.
//!     let token = flow.exchange_code("authorization_code_from_redirect").await?;
//!     assert!(token.is_valid());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod flow;
pub mod provider;
pub mod token;

pub use error::{Error, Result};
pub use flow::{AuthorizationCodeFlow, OAuthClient, csrf};
pub use provider::Provider;
pub use token::{Credential, Token};
