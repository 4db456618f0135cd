//! Authentication port: exchanging operator credentials for a session grant.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::UserProfile;

/// Username/password pair sent to the session-creation endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginGrant {
    #[serde(rename = "accessToken")]
    pub access_token: String,

    #[serde(rename = "userInfo", default)]
    pub user_info: Option<UserProfile>,
}

impl LoginGrant {
    /// A grant is only usable if it actually carries a credential.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.access_token.trim().is_empty() {
            return Err(AuthError::MalformedGrant("empty access token".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backend refused the credentials (or answered with a non-success code).
    #[error("login rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered, but the grant is unusable.
    #[error("malformed login grant: {0}")]
    MalformedGrant(String),
}

/// Collaborator that performs the actual login exchange.
///
/// The HTTP implementation lives in `adminkit-client`; tests use fakes.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, request: &LoginRequest) -> Result<LoginGrant, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grant_uses_wire_names() {
        let grant: LoginGrant = serde_json::from_value(json!({
            "accessToken": "T1",
            "userInfo": { "id": 1 }
        }))
        .unwrap();

        assert_eq!(grant.access_token, "T1");
        assert!(grant.user_info.is_some());
        assert!(grant.validate().is_ok());
    }

    #[test]
    fn blank_token_is_malformed() {
        let grant = LoginGrant {
            access_token: "  ".to_string(),
            user_info: None,
        };
        assert!(matches!(grant.validate(), Err(AuthError::MalformedGrant(_))));
    }

    #[test]
    fn request_debug_hides_password() {
        let req = LoginRequest::new("admin", "hunter2");
        assert!(!format!("{req:?}").contains("hunter2"));
    }
}
