//! Answering a user's "when am I free?" message.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};
use url::Url;

use crate::Result;
use crate::auth::{AuthFlowController, AuthorizationProvider, CallbackOutcome, RedirectCallback};
use crate::availability::{BusyCalendar, QueryWindow, compute_free_evenings};
use crate::session::SessionStore;

/// Reply to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The user must authorize calendar access first.
    AuthorizationRequired {
        /// Name to address the user by.
        display_name: String,
        /// Consent URL of the newly started flow.
        url: Url,
    },
    /// Starts of the next free evenings (possibly none).
    FreeEvenings(Vec<DateTime<FixedOffset>>),
    /// Busy data could not be fetched or understood.
    Unavailable,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthorizationRequired { display_name, url } => {
                write!(f, "@{display_name} auth please: {url}")
            }
            Self::FreeEvenings(evenings) if evenings.is_empty() => {
                write!(f, "No free evenings in the next week.")
            }
            Self::FreeEvenings(evenings) => {
                write!(f, "Free evenings:")?;
                for evening in evenings {
                    write!(f, "\n- {}", evening.format("%a %d %b %H:%M"))?;
                }
                Ok(())
            }
            Self::Unavailable => write!(f, "Unable to compute availability right now."),
        }
    }
}

/// Message handling on top of the authorization flow and a busy calendar.
#[derive(Debug)]
pub struct Assistant<S, P, B> {
    auth: AuthFlowController<S, P>,
    calendar: B,
}

impl<S, P, B> Assistant<S, P, B>
where
    P: AuthorizationProvider,
    S: SessionStore<P::Credential>,
    B: BusyCalendar<P::Credential>,
{
    /// Creates an assistant.
    #[must_use]
    pub const fn new(auth: AuthFlowController<S, P>, calendar: B) -> Self {
        Self { auth, calendar }
    }

    /// Returns the authorization flow controller.
    #[must_use]
    pub const fn auth(&self) -> &AuthFlowController<S, P> {
        &self.auth
    }

    /// Returns the busy calendar.
    #[must_use]
    pub const fn calendar(&self) -> &B {
        &self.calendar
    }

    /// Handles a message from `user_id` received at `now`.
    ///
    /// Unauthorized users get a fresh consent URL; authorized users get their
    /// next free evenings in the offset of `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if a new flow cannot be started.
    pub async fn handle_message(
        &self,
        user_id: &str,
        display_name: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<Reply> {
        let Some(credential) = self.auth.credential(user_id) else {
            debug!("User {user_id} is not authorized, starting flow");
            let url = self.auth.start_flow(user_id)?;
            return Ok(Reply::AuthorizationRequired {
                display_name: display_name.to_string(),
                url,
            });
        };

        let evenings = match QueryWindow::seven_days_from(now) {
            Ok(window) => self
                .calendar
                .busy_intervals(&credential, window)
                .await
                .and_then(|busy| compute_free_evenings(now, &busy)),
            Err(e) => Err(e),
        };

        match evenings {
            Ok(evenings) => Ok(Reply::FreeEvenings(evenings)),
            Err(e) => {
                warn!("Availability for user {user_id} failed: {e}");
                Ok(Reply::Unavailable)
            }
        }
    }

    /// Resolves an authorization redirect.
    ///
    /// # Errors
    ///
    /// See [`AuthFlowController::handle_redirect`].
    pub async fn handle_redirect(&self, callback: &RedirectCallback) -> Result<CallbackOutcome> {
        self.auth.handle_redirect(callback).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ts(value: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(value).unwrap()
    }

    #[test]
    fn test_render_authorization_required() {
        let reply = Reply::AuthorizationRequired {
            display_name: "samu".into(),
            url: Url::parse("https://auth.example.com/authorize?state=abc").unwrap(),
        };
        assert_eq!(
            reply.to_string(),
            "@samu auth please: https://auth.example.com/authorize?state=abc"
        );
    }

    #[test]
    fn test_render_free_evenings() {
        let reply = Reply::FreeEvenings(vec![
            ts("2018-02-15T19:00:00+01:00"),
            ts("2018-02-17T19:00:00+01:00"),
        ]);
        assert_eq!(
            reply.to_string(),
            "Free evenings:\n- Thu 15 Feb 19:00\n- Sat 17 Feb 19:00"
        );
    }

    #[test]
    fn test_render_empty_and_unavailable() {
        assert_eq!(
            Reply::FreeEvenings(Vec::new()).to_string(),
            "No free evenings in the next week."
        );
        assert_eq!(
            Reply::Unavailable.to_string(),
            "Unable to compute availability right now."
        );
    }
}
