//! Authorization flow controller.
//!
//! Per user the flow moves `NoFlow -> FlowStarted -> Authenticated`.
//! Starting again re-enters `FlowStarted` with a new CSRF token, which makes
//! any redirect of the previous flow fail with [`Error::CsrfMismatch`].

use availabot_oauth::{AuthorizationCodeFlow, Credential, Token, csrf};
use tracing::{debug, info, warn};
use url::Url;

use super::state::AuthState;
use crate::session::SessionStore;
use crate::{Error, Result};

/// The provider side of an authorization code flow.
pub trait AuthorizationProvider: Send + Sync {
    /// Credential obtained by exchanging an authorization code.
    type Credential: Credential;

    /// Builds the consent URL carrying the encoded `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be constructed.
    fn authorization_url(&self, state: &str) -> availabot_oauth::Result<Url>;

    /// Exchanges an authorization code for a credential.
    fn exchange(
        &self,
        code: &str,
    ) -> impl Future<Output = availabot_oauth::Result<Self::Credential>> + Send;
}

impl AuthorizationProvider for AuthorizationCodeFlow {
    type Credential = Token;

    fn authorization_url(&self, state: &str) -> availabot_oauth::Result<Url> {
        Self::authorization_url(self, None, Some(state))
    }

    fn exchange(
        &self,
        code: &str,
    ) -> impl Future<Output = availabot_oauth::Result<Token>> + Send {
        self.exchange_code(code)
    }
}

/// Starts and completes per-user authorization flows.
#[derive(Debug)]
pub struct AuthFlowController<S, P> {
    store: S,
    provider: P,
}

impl<S, P> AuthFlowController<S, P>
where
    P: AuthorizationProvider,
    S: SessionStore<P::Credential>,
{
    /// Creates a controller over a session store and a provider.
    #[must_use]
    pub const fn new(store: S, provider: P) -> Self {
        Self { store, provider }
    }

    /// Returns the session store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the authorization provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Starts a new flow for `user_id` and returns the consent URL.
    ///
    /// The new CSRF token replaces any previous one. A credential already held
    /// by the user is kept until a later flow completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be encoded or the URL built.
    pub fn start_flow(&self, user_id: &str) -> Result<Url> {
        let csrf_token = csrf::generate_token();
        let state = AuthState::new(user_id, &csrf_token).encode()?;

        self.store.restart(user_id, csrf_token);

        debug!("Started authorization flow for user {user_id}");
        Ok(self.provider.authorization_url(&state)?)
    }

    /// Completes a flow from the redirect's `state` and authorization code.
    ///
    /// The store is only written when every check and the exchange succeed.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedState`] if `encoded_state` cannot be decoded
    /// - [`Error::NoSuchFlow`] if the user never started a flow
    /// - [`Error::CsrfMismatch`] if the token is not the one issued last,
    ///   including when a newer flow started while the exchange was running
    /// - [`Error::ExchangeFailed`] if the provider rejects the code
    pub async fn complete_flow(&self, encoded_state: &str, auth_code: &str) -> Result<()> {
        let state = AuthState::decode(encoded_state)?;

        let Some(session) = self.store.get(&state.user_id) else {
            return Err(Error::NoSuchFlow {
                user_id: state.user_id,
            });
        };

        if !csrf::tokens_match(&session.csrf_token, &state.csrf_token) {
            warn!(
                "CSRF token mismatch on authorization redirect for user {}",
                state.user_id
            );
            return Err(Error::CsrfMismatch {
                user_id: state.user_id,
            });
        }

        let credential = self
            .provider
            .exchange(auth_code)
            .await
            .map_err(Error::ExchangeFailed)?;

        if !self
            .store
            .put_if_current(session.with_credential(Some(credential)))
        {
            warn!(
                "Authorization flow for user {} was superseded during code exchange",
                state.user_id
            );
            return Err(Error::CsrfMismatch {
                user_id: state.user_id,
            });
        }

        info!("User {} authorized calendar access", state.user_id);
        Ok(())
    }

    /// Returns true if the user holds a currently valid credential.
    #[must_use]
    pub fn is_authenticated(&self, user_id: &str) -> bool {
        self.store.is_authenticated(user_id)
    }

    /// Returns the user's credential if it is currently valid.
    #[must_use]
    pub fn credential(&self, user_id: &str) -> Option<P::Credential> {
        self.store
            .get(user_id)
            .and_then(|s| s.credential)
            .filter(Credential::is_valid)
    }
}
