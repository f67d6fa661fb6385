//! Session storage.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use availabot_oauth::Credential;
use tracing::debug;

use super::Session;

/// Storage for sessions keyed by user id.
///
/// Implementations must never expose a partially written session.
pub trait SessionStore<C: Credential>: Send + Sync {
    /// Returns a snapshot of the session for `user_id`.
    fn get(&self, user_id: &str) -> Option<Session<C>>;

    /// Inserts or replaces the session for `session.user_id`.
    fn put(&self, session: Session<C>);

    /// Replaces the stored session only if its CSRF token still equals
    /// `session.csrf_token`. Returns whether the write happened.
    fn put_if_current(&self, session: Session<C>) -> bool;

    /// Issues `csrf_token` as the user's current flow token in one write,
    /// keeping any credential already stored.
    fn restart(&self, user_id: &str, csrf_token: String);

    /// Returns true if the user holds a currently valid credential.
    fn is_authenticated(&self, user_id: &str) -> bool {
        self.get(user_id).is_some_and(|s| s.is_authenticated())
    }
}

/// Process-lifetime session store behind a single reader/writer lock.
///
/// Sessions are never evicted.
#[derive(Debug)]
pub struct InMemorySessionStore<C> {
    sessions: RwLock<HashMap<String, Session<C>>>,
}

impl<C> InMemorySessionStore<C> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Number of users with a session.
    #[must_use]
    pub fn len(&self) -> usize {
        // Writers replace whole entries, so a poisoned map is still consistent.
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no flow has been started yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> Default for InMemorySessionStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Credential> SessionStore<C> for InMemorySessionStore<C> {
    fn get(&self, user_id: &str) -> Option<Session<C>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    fn put(&self, session: Session<C>) {
        debug!("Storing session for user {}", session.user_id);
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.user_id.clone(), session);
    }

    fn put_if_current(&self, session: Session<C>) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(&session.user_id) {
            Some(current) if current.csrf_token == session.csrf_token => {
                debug!("Updating session for user {}", session.user_id);
                *current = session;
                true
            }
            _ => false,
        }
    }

    fn restart(&self, user_id: &str, csrf_token: String) {
        debug!("Restarting authorization flow for user {user_id}");
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(user_id.to_string())
            .and_modify(|session| session.csrf_token.clone_from(&csrf_token))
            .or_insert_with(|| Session::new(user_id, csrf_token.clone()));
    }

    fn is_authenticated(&self, user_id: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .is_some_and(Session::is_authenticated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct FakeCredential(bool);

    impl Credential for FakeCredential {
        fn is_valid(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_get_absent() {
        let store = InMemorySessionStore::<FakeCredential>::new();
        assert!(store.get("1").is_none());
        assert!(!store.is_authenticated("1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_then_get() {
        let store = InMemorySessionStore::new();
        store.put(Session::<FakeCredential>::new("1", "csrf"));

        let session = store.get("1").unwrap();
        assert_eq!(session.user_id, "1");
        assert_eq!(session.csrf_token, "csrf");
        assert!(session.credential.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_put_overwrites() {
        let store = InMemorySessionStore::new();
        store.put(Session::<FakeCredential>::new("1", "first"));
        store.put(Session::new("1", "second"));

        assert_eq!(store.get("1").unwrap().csrf_token, "second");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_is_authenticated_requires_valid_credential() {
        let store = InMemorySessionStore::new();
        store.put(Session::new("none", "c"));
        store.put(Session::new("expired", "c").with_credential(Some(FakeCredential(false))));
        store.put(Session::new("valid", "c").with_credential(Some(FakeCredential(true))));

        assert!(!store.is_authenticated("none"));
        assert!(!store.is_authenticated("expired"));
        assert!(store.is_authenticated("valid"));
        assert!(!store.is_authenticated("missing"));
    }

    #[test]
    fn test_put_if_current() {
        let store = InMemorySessionStore::new();
        store.put(Session::<FakeCredential>::new("1", "old"));
        store.put(Session::new("1", "new"));

        let stale = Session::new("1", "old").with_credential(Some(FakeCredential(true)));
        assert!(!store.put_if_current(stale));
        assert!(!store.is_authenticated("1"));

        let current = Session::new("1", "new").with_credential(Some(FakeCredential(true)));
        assert!(store.put_if_current(current));
        assert!(store.is_authenticated("1"));
    }

    #[test]
    fn test_put_if_current_without_session() {
        let store = InMemorySessionStore::<FakeCredential>::new();
        assert!(!store.put_if_current(Session::new("1", "c")));
        assert!(store.get("1").is_none());
    }

    #[test]
    fn test_restart_creates_session() {
        let store = InMemorySessionStore::<FakeCredential>::new();
        store.restart("1", "first".into());

        let session = store.get("1").unwrap();
        assert_eq!(session.csrf_token, "first");
        assert!(session.credential.is_none());
    }

    #[test]
    fn test_restart_keeps_credential() {
        let store = InMemorySessionStore::new();
        store.put(Session::new("1", "old").with_credential(Some(FakeCredential(true))));

        store.restart("1", "new".into());

        let session = store.get("1").unwrap();
        assert_eq!(session.csrf_token, "new");
        assert_eq!(session.credential, Some(FakeCredential(true)));
    }

    #[test]
    fn test_restart_racing_commit_never_drops_credential() {
        let store = Arc::new(InMemorySessionStore::<FakeCredential>::new());
        store.restart("1", "t0".into());

        let restarter = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 1..500 {
                    store.restart("1", format!("t{i}"));
                }
            })
        };

        let mut committed = false;
        for _ in 0..500 {
            let current = store.get("1").unwrap();
            let credentialed = current.with_credential(Some(FakeCredential(true)));
            committed |= store.put_if_current(credentialed);
            if committed {
                // Once an exchange has committed, restarts must keep its credential.
                assert!(store.get("1").unwrap().credential.is_some());
            }
        }
        restarter.join().unwrap();

        assert_eq!(store.is_authenticated("1"), committed);
    }

    #[test]
    fn test_concurrent_writers_never_tear() {
        let store = Arc::new(InMemorySessionStore::<FakeCredential>::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..200 {
                        let token = format!("t{i}-{j}");
                        store.put(Session::new("shared", token.clone()));
                        let seen = store.get("shared").unwrap();
                        // Whole sessions only: the token always has the writer's shape.
                        assert!(seen.csrf_token.starts_with('t'));
                        assert_eq!(seen.user_id, "shared");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 1);
    }
}
