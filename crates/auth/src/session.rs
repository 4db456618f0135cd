//! Session value and the cached user profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use adminkit_core::UserId;

/// Profile of the signed-in operator, as returned by the backend.
///
/// Fields the console does not interpret are kept in `extra` so that writing
/// the profile back to storage is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,

    /// Display name.
    #[serde(default, alias = "nickname", alias = "displayName")]
    pub username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Avatar reference (usually a URL returned by the upload endpoint).
    #[serde(default)]
    pub avatar: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            username: None,
            email: None,
            avatar: None,
            extra: Map::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Snapshot of the operator session.
///
/// # Invariants
/// - Logged-in status is defined solely by a non-empty credential.
/// - Credential and profile are replaced together; a `Session` value is never
///   half-updated.
///
/// This is also the persisted layout. The legacy field names `accessToken`
/// and `userInfo` are accepted on read.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, alias = "accessToken")]
    credential: String,

    #[serde(default, alias = "userInfo")]
    profile: Option<UserProfile>,

    #[serde(default)]
    authenticated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// The unauthenticated session.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn authenticated(
        credential: impl Into<String>,
        profile: Option<UserProfile>,
        authenticated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            credential: credential.into(),
            profile,
            authenticated_at: Some(authenticated_at),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        !self.credential.is_empty()
    }

    /// The bearer credential, if one is held.
    pub fn credential(&self) -> Option<&str> {
        if self.credential.is_empty() {
            None
        } else {
            Some(&self.credential)
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.authenticated_at
    }

    pub(crate) fn replace_profile(&mut self, profile: Option<UserProfile>) {
        self.profile = profile;
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let credential = if self.credential.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Session")
            .field("credential", &credential)
            .field("profile", &self.profile)
            .field("authenticated_at", &self.authenticated_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_session_is_logged_out() {
        let s = Session::empty();
        assert!(!s.is_logged_in());
        assert_eq!(s.credential(), None);
    }

    #[test]
    fn profile_without_credential_is_not_logged_in() {
        let s: Session = serde_json::from_value(json!({
            "credential": "",
            "profile": { "id": 1, "username": "root" }
        }))
        .unwrap();

        assert!(s.profile().is_some());
        assert!(!s.is_logged_in());
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let s: Session = serde_json::from_value(json!({
            "accessToken": "abc",
            "userInfo": { "id": 7, "nickname": "ops", "role": "admin" }
        }))
        .unwrap();

        assert_eq!(s.credential(), Some("abc"));
        let profile = s.profile().unwrap();
        assert_eq!(profile.id, UserId::Numeric(7));
        assert_eq!(profile.username.as_deref(), Some("ops"));
        assert_eq!(profile.extra.get("role"), Some(&json!("admin")));
    }

    #[test]
    fn debug_output_redacts_credential() {
        let s = Session::authenticated("secret-token", None, Utc::now());
        let rendered = format!("{s:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
