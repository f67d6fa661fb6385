//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The `state` value of a redirect is not a valid encoded auth state.
    #[error("Malformed authorization state: {0}")]
    MalformedState(String),

    /// A flow was completed for a user who never started one.
    #[error("No authorization flow found for user {user_id}")]
    NoSuchFlow {
        /// User the redirect claimed to belong to.
        user_id: String,
    },

    /// The redirect's CSRF token does not match the one issued last.
    #[error("Invalid CSRF token for user {user_id}")]
    CsrfMismatch {
        /// User the redirect claimed to belong to.
        user_id: String,
    },

    /// The provider refused to exchange the authorization code.
    #[error("Credential exchange failed: {0}")]
    ExchangeFailed(#[source] availabot_oauth::Error),

    /// A busy interval carried a timestamp that is not RFC 3339.
    #[error("Unable to parse timestamp {value:?}: {source}")]
    TimestampParse {
        /// Offending value.
        value: String,
        /// Parser error.
        #[source]
        source: chrono::ParseError,
    },

    /// A candidate evening falls past the last representable date.
    #[error("Date out of range: no evening after {0}")]
    DateOutOfRange(chrono::DateTime<chrono::FixedOffset>),

    /// Building the provider authorization URL failed.
    #[error("OAuth error: {0}")]
    OAuth(#[from] availabot_oauth::Error),

    /// Encoding the auth state failed.
    #[error("State encoding error: {0}")]
    StateEncoding(#[from] serde_json::Error),

    /// The calendar collaborator failed to return busy intervals.
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true if the user should simply be asked to authorize again.
    #[must_use]
    pub const fn is_user_retryable(&self) -> bool {
        matches!(
            self,
            Self::MalformedState(_) | Self::NoSuchFlow { .. } | Self::ExchangeFailed(_)
        )
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
