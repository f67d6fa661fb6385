//! Encoding of the OAuth `state` parameter.
//!
//! The state carries the user id and the flow's CSRF token through the
//! provider redirect as URL-safe base64 over a small JSON object. The
//! credential is never part of it.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Decoded contents of a `state` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// User the flow was started for.
    #[serde(rename = "tuid")]
    pub user_id: String,
    /// CSRF token issued when the flow started.
    #[serde(rename = "csrf")]
    pub csrf_token: String,
}

impl AuthState {
    /// Creates a new state.
    #[must_use]
    pub fn new(user_id: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            csrf_token: csrf_token.into(),
        }
    }

    /// Encodes the state into its transport form.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE.encode(json))
    }

    /// Decodes a state produced by [`AuthState::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedState`] if the value is not valid base64 or
    /// does not hold both fields.
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = URL_SAFE
            .decode(encoded)
            .map_err(|e| Error::MalformedState(format!("invalid base64: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::MalformedState(format!("invalid payload: {e}")))
    }
}

/// Encodes `user_id` and `csrf_token` into a `state` value.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode(user_id: &str, csrf_token: &str) -> Result<String> {
    AuthState::new(user_id, csrf_token).encode()
}

/// Decodes a `state` value into `(user_id, csrf_token)`.
///
/// # Errors
///
/// Returns [`Error::MalformedState`] on any decoding failure.
pub fn decode(encoded: &str) -> Result<(String, String)> {
    let state = AuthState::decode(encoded)?;
    Ok((state.user_id, state.csrf_token))
}
