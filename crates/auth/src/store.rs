//! The session store: single owner of the operator session.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::{Authenticator, LoginRequest, MemoryPersistence, Session, SessionPersistence, UserProfile};

/// Shared handle to the operator session.
///
/// Cloning is cheap and every clone observes the same state. The router and the
/// request pipeline each hold a clone; neither keeps a private copy.
///
/// # Invariants
/// - Credential and profile change together under one write lock.
/// - Every mutation is mirrored to the persistence port before the lock is
///   released, so storage order matches memory order.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: RwLock<Session>,
    persistence: Arc<dyn SessionPersistence>,
}

impl SessionStore {
    /// Open the store, rehydrating from `persistence`.
    ///
    /// Missing or unreadable storage yields an empty session.
    pub fn open(persistence: Arc<dyn SessionPersistence>) -> Self {
        let session = match persistence.load() {
            Ok(Some(session)) => {
                tracing::debug!(logged_in = session.is_logged_in(), "restored session from storage");
                session
            }
            Ok(None) => Session::empty(),
            Err(err) => {
                tracing::warn!(error = %err, "stored session unreadable; starting logged out");
                Session::empty()
            }
        };

        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(session),
                persistence,
            }),
        }
    }

    /// Store backed by [`MemoryPersistence`].
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryPersistence::new()))
    }

    /// Authenticate through `authenticator` and install the resulting session.
    ///
    /// Returns `false` on any failure and leaves the current state untouched.
    pub async fn login<A>(&self, authenticator: &A, username: &str, password: &str) -> bool
    where
        A: Authenticator + ?Sized,
    {
        let request = LoginRequest::new(username, password);

        let grant = match authenticator.authenticate(&request).await {
            Ok(grant) => grant,
            Err(err) => {
                tracing::warn!(username, error = %err, "login failed");
                return false;
            }
        };

        if let Err(err) = grant.validate() {
            tracing::warn!(username, error = %err, "login returned an unusable grant");
            return false;
        }

        let session = Session::authenticated(grant.access_token, grant.user_info, Utc::now());
        let mut state = self.write();
        *state = session;
        self.persist(&state);
        drop(state);

        tracing::info!(username, "operator logged in");
        true
    }

    /// Clear credential and profile. Idempotent.
    pub fn logout(&self) {
        let mut state = self.write();
        *state = Session::empty();
        self.persist(&state);
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().is_logged_in()
    }

    /// Replace the cached profile, keeping the credential.
    pub fn set_profile(&self, profile: UserProfile) {
        let mut state = self.write();
        state.replace_profile(Some(profile));
        self.persist(&state);
    }

    pub fn credential(&self) -> Option<String> {
        self.read().credential().map(str::to_string)
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.read().profile().cloned()
    }

    /// Consistent copy of the whole session.
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Write the current session to storage again (shutdown hook).
    pub fn flush(&self) {
        let state = self.read();
        self.persist(&state);
    }

    fn persist(&self, session: &Session) {
        if let Err(err) = self.inner.persistence.save(session) {
            tracing::warn!(error = %err, "failed to persist session");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.read())
            .finish_non_exhaustive()
    }
}
