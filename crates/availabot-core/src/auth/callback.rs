//! Handling of the provider's redirect back to the assistant.

use tracing::warn;
use url::form_urlencoded;

use super::controller::{AuthFlowController, AuthorizationProvider};
use crate::session::SessionStore;
use crate::{Error, Result};

/// Query parameters of an authorization redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectCallback {
    /// Error reported by the provider (e.g. `access_denied`).
    pub error: Option<String>,
    /// Encoded auth state.
    pub state: Option<String>,
    /// Authorization code.
    pub code: Option<String>,
}

impl RedirectCallback {
    /// Parses the query string of the redirect URL (without the leading `?`).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut callback = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = Some(value.into_owned()).filter(|v| !v.is_empty());
            match key.as_ref() {
                "error" => callback.error = value,
                "state" => callback.state = value,
                "code" => callback.code = value,
                _ => {}
            }
        }
        callback
    }
}

/// How a redirect was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The user declined or the provider failed; no flow was completed.
    Abandoned {
        /// Provider error code.
        reason: String,
    },
    /// The flow completed and the credential is stored.
    Authorized,
}

impl CallbackOutcome {
    /// Plain-text body to answer the redirect with.
    #[must_use]
    pub const fn response_text(&self) -> &'static str {
        match self {
            Self::Abandoned { .. } => "bummer",
            Self::Authorized => "kthxbai",
        }
    }
}

impl<S, P> AuthFlowController<S, P>
where
    P: AuthorizationProvider,
    S: SessionStore<P::Credential>,
{
    /// Resolves a redirect: abandons on provider error, otherwise completes the flow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedState`] if `state` or `code` is missing, and
    /// any error of [`AuthFlowController::complete_flow`].
    pub async fn handle_redirect(&self, callback: &RedirectCallback) -> Result<CallbackOutcome> {
        if let Some(reason) = &callback.error {
            warn!("Authorization abandoned by provider: {reason}");
            return Ok(CallbackOutcome::Abandoned {
                reason: reason.clone(),
            });
        }

        let (Some(state), Some(code)) = (&callback.state, &callback.code) else {
            return Err(Error::MalformedState(
                "redirect is missing state or code".into(),
            ));
        };

        self.complete_flow(state, code).await?;
        Ok(CallbackOutcome::Authorized)
    }
}
