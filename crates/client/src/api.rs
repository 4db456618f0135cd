//! Typed bindings for the user/session endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::IgnoredAny;

use adminkit_auth::{AuthError, Authenticator, LoginGrant, LoginRequest, UserProfile};

use crate::types::VerificationCodeRequest;
use crate::{ApiRequest, FailureClass, Page, PageQuery, PasswordChange, RequestError, RequestPipeline};

const PATH_LOGIN: &str = "/user/admin/login";
const PATH_LOGOUT: &str = "/user/logout";
const PATH_USER_INFO: &str = "/user/info";
const PATH_UPDATE_PASSWORD: &str = "/user/admin/update_password";
const PATH_USER_LIST: &str = "/user/list";
const PATH_SEND_CODE: &str = "/user/send_code";

/// `/user/info` answers either `{ userInfo: {...} }` or the profile itself.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfilePayload {
    Wrapped {
        #[serde(rename = "userInfo")]
        user_info: UserProfile,
    },
    Bare(UserProfile),
}

impl From<ProfilePayload> for UserProfile {
    fn from(value: ProfilePayload) -> Self {
        match value {
            ProfilePayload::Wrapped { user_info } => user_info,
            ProfilePayload::Bare(profile) => profile,
        }
    }
}

/// User and session endpoints.
#[derive(Debug, Clone)]
pub struct UserApi {
    pipeline: Arc<RequestPipeline>,
}

impl UserApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    /// Exchange credentials for a grant. Does not touch the session; use
    /// `SessionStore::login(&user_api, ..)` for that.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, RequestError> {
        self.pipeline.post(PATH_LOGIN, request).await
    }

    /// Server-side session teardown.
    pub async fn logout(&self) -> Result<(), RequestError> {
        self.pipeline
            .send::<IgnoredAny>(ApiRequest::post(PATH_LOGOUT))
            .await
            .map(|_| ())
    }

    /// Tear down the server session (best effort) and always clear the local one.
    pub async fn sign_out(&self) {
        if let Err(err) = self.logout().await {
            tracing::debug!(error = %err, "remote logout failed; clearing local session anyway");
        }
        self.pipeline.session().logout();
    }

    pub async fn user_info(&self) -> Result<UserProfile, RequestError> {
        let payload: ProfilePayload = self.pipeline.get(PATH_USER_INFO).await?;
        Ok(payload.into())
    }

    /// Fetch the current profile and cache it in the session.
    pub async fn refresh_profile(&self) -> Result<UserProfile, RequestError> {
        let profile = self.user_info().await?;
        self.pipeline.session().set_profile(profile.clone());
        Ok(profile)
    }

    /// Save profile edits, then cache the edited profile.
    pub async fn update_user_info(&self, profile: &UserProfile) -> Result<(), RequestError> {
        let _: IgnoredAny = self.pipeline.put(PATH_USER_INFO, profile).await?;
        self.pipeline.session().set_profile(profile.clone());
        Ok(())
    }

    pub async fn update_password(&self, change: &PasswordChange) -> Result<(), RequestError> {
        let _: IgnoredAny = self.pipeline.post(PATH_UPDATE_PASSWORD, change).await?;
        Ok(())
    }

    pub async fn list_users(&self, query: PageQuery) -> Result<Page<UserProfile>, RequestError> {
        let request = ApiRequest::get(PATH_USER_LIST)
            .query("page", query.page)
            .query("pageSize", query.page_size);
        self.pipeline.send(request).await
    }

    /// Ask the backend to send a one-time verification code.
    pub async fn send_verification_code(&self, email: &str) -> Result<(), RequestError> {
        let _: IgnoredAny = self
            .pipeline
            .post(PATH_SEND_CODE, &VerificationCodeRequest { email })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Authenticator for UserApi {
    async fn authenticate(&self, request: &LoginRequest) -> Result<LoginGrant, AuthError> {
        self.login(request).await.map_err(|err| match err.class {
            FailureClass::Network => AuthError::Transport(err.message),
            FailureClass::Request if err.status.is_none() && err.code.is_none() => {
                AuthError::MalformedGrant(err.detail.unwrap_or(err.message))
            }
            _ => AuthError::Rejected(err.message),
        })
    }
}
