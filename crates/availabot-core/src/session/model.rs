//! Session data model.

use availabot_oauth::Credential;

/// Authorization state of one user.
///
/// Exists once the user has started a flow at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session<C> {
    /// Stable identifier of the user on the messaging side.
    pub user_id: String,
    /// CSRF token of the most recently started flow.
    pub csrf_token: String,
    /// Access credential, absent until a flow completes.
    pub credential: Option<C>,
}

impl<C: Credential> Session<C> {
    /// Creates a session for a freshly started flow.
    #[must_use]
    pub fn new(user_id: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            csrf_token: csrf_token.into(),
            credential: None,
        }
    }

    /// Sets the credential.
    #[must_use]
    pub fn with_credential(mut self, credential: Option<C>) -> Self {
        self.credential = credential;
        self
    }

    /// Returns true if a credential is present and still valid.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential.as_ref().is_some_and(Credential::is_valid)
    }
}
