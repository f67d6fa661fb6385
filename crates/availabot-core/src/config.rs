//! OAuth client settings.

use std::env;

use availabot_oauth::provider::GOOGLE_CALENDAR_READONLY_SCOPE;
use availabot_oauth::{AuthorizationCodeFlow, OAuthClient, Provider};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Environment variable holding the OAuth client id.
pub const CLIENT_ID_VAR: &str = "BOT_CLIENT_ID";

/// Environment variable holding the OAuth client secret.
pub const CLIENT_SECRET_VAR: &str = "BOT_CLIENT_SECRET";

/// Redirect endpoint the callback listener serves by default.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8081/oauth2";

/// Settings for the calendar provider's OAuth client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthSettings {
    /// Client ID issued by the provider.
    pub client_id: String,
    /// Client secret, if the client is confidential.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Where the provider redirects after consent.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// Scopes to request.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn default_scopes() -> Vec<String> {
    vec![GOOGLE_CALENDAR_READONLY_SCOPE.to_string()]
}

impl OAuthSettings {
    /// Creates settings with the given client id and defaults elsewhere.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
        }
    }

    /// Reads `BOT_CLIENT_ID` and `BOT_CLIENT_SECRET` from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the client id is missing or the settings are invalid.
    pub fn from_env() -> Result<Self> {
        let client_id = env::var(CLIENT_ID_VAR)
            .map_err(|_| Error::Config(format!("{CLIENT_ID_VAR} is not set")))?;
        let client_secret = env::var(CLIENT_SECRET_VAR).ok().filter(|s| !s.is_empty());

        let settings = Self {
            client_secret,
            ..Self::new(client_id)
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client id is empty or the redirect URI is not a URL.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::Config("client_id is empty".into()));
        }
        Url::parse(&self.redirect_uri)
            .map_err(|e| Error::Config(format!("redirect_uri {:?}: {e}", self.redirect_uri)))?;
        Ok(())
    }

    /// Builds the Google Calendar authorization code flow for these settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid.
    pub fn authorization_flow(&self) -> Result<AuthorizationCodeFlow> {
        self.validate()?;
        let provider = Provider::google_calendar()?.with_default_scopes(self.scopes.clone());

        let mut client =
            OAuthClient::new(&self.client_id, provider).with_redirect_uri(&self.redirect_uri);
        if let Some(secret) = &self.client_secret {
            client = client.with_client_secret(secret);
        }
        Ok(AuthorizationCodeFlow::new(client))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let settings: OAuthSettings = serde_json::from_str(r#"{"client_id":"abc"}"#).unwrap();
        assert_eq!(settings.client_id, "abc");
        assert!(settings.client_secret.is_none());
        assert_eq!(settings.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(settings.scopes, vec![GOOGLE_CALENDAR_READONLY_SCOPE]);
        settings.validate().unwrap();
    }

    #[test]
    fn test_empty_client_id_rejected() {
        let settings = OAuthSettings::new("  ");
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_redirect_rejected() {
        let settings = OAuthSettings {
            redirect_uri: "localhost oauth".into(),
            ..OAuthSettings::new("abc")
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_authorization_flow_uses_settings() {
        let settings = OAuthSettings {
            client_secret: Some("s3cret".into()),
            ..OAuthSettings::new("abc")
        };
        let flow = settings.authorization_flow().unwrap();
        assert_eq!(flow.client().client_id, "abc");
        assert_eq!(flow.client().client_secret.as_deref(), Some("s3cret"));

        let url = flow.authorization_url(None, Some("st")).unwrap();
        assert!(url.as_str().contains("calendar.readonly"));
        assert!(url.as_str().contains("redirect_uri=http%3A%2F%2Flocalhost%3A8081%2Foauth2"));
    }
}
