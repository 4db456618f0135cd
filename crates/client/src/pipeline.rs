//! The request pipeline: one choke point for every backend call.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use adminkit_auth::SessionStore;
use adminkit_core::Navigator;

use crate::envelope::{Envelope, ErrorBody};
use crate::failure::MSG_INVALID_ENVELOPE;
use crate::{ClientConfig, ConfigError, Failure, FailureClass, Notice, Notifier, RequestError, classify};

/// Body of an outbound call.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Form),
}

/// A call about to go through the pipeline.
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body. A value that cannot be serialized becomes `null`.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        let value = serde_json::to_value(body).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "request body not serializable; sending null");
            Value::Null
        });
        self.body = RequestBody::Json(value);
        self
    }

    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }
}

/// Outbound stage: attach the session credential, if any.
///
/// Only ever writes the `Authorization` header and replaces any previous value,
/// so applying it twice leaves the same headers as applying it once.
pub fn apply_credential(headers: &mut HeaderMap, session: &SessionStore) {
    let Some(credential) = session.credential() else {
        return;
    };

    match HeaderValue::from_str(&format!("Bearer {credential}")) {
        Ok(mut value) => {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Err(_) => {
            tracing::warn!("credential is not a valid header value; sending unauthenticated");
        }
    }
}

/// Sends calls, unwraps envelopes and reacts to failures.
///
/// The pipeline reads the session at dispatch time and never caches it. It
/// performs no retries: every failure is reported once and returned.
pub struct RequestPipeline {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl RequestPipeline {
    pub fn new(
        config: ClientConfig,
        session: SessionStore,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            session,
            notifier,
            navigator,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::post(path).json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::put(path).json(body)).await
    }

    /// Send a call and return the unwrapped envelope payload.
    ///
    /// An absent `data` field is decoded from `null`, so `()` and
    /// `serde::de::IgnoredAny` work for calls without a payload.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, RequestError> {
        let request_id = Uuid::now_v7();
        let span = tracing::debug_span!(
            "api_request",
            %request_id,
            method = %request.method,
            path = %request.path,
        );

        self.dispatch(request).instrument(span).await
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, RequestError> {
        let mut headers = HeaderMap::new();
        apply_credential(&mut headers, &self.session);

        let mut builder = self
            .http
            .request(request.method, self.config.endpoint(&request.path))
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) if err.is_builder() => {
                let failure = Failure::Malformed {
                    reason: err.to_string(),
                };
                return Err(self.reject(failure, Some(err)));
            }
            Err(err) => {
                let failure = Failure::Unreachable {
                    reason: err.to_string(),
                };
                return Err(self.reject(failure, Some(err)));
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                let failure = Failure::Unreachable {
                    reason: err.to_string(),
                };
                return Err(self.reject(failure, Some(err)));
            }
        };

        if !status.is_success() {
            let failure = Failure::Status {
                status: status.as_u16(),
                detail: ErrorBody::detail(&body),
            };
            return Err(self.reject(failure, None));
        }

        let envelope: Envelope<Value> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(err) => {
                let failure = Failure::Malformed {
                    reason: format!("{MSG_INVALID_ENVELOPE}: {err}"),
                };
                return Err(self.reject(failure, None));
            }
        };

        if !self.config.accepts(envelope.code) {
            let failure = Failure::Logical {
                code: envelope.code,
                message: envelope.message.filter(|m| !m.trim().is_empty()),
            };
            return Err(self.reject(failure, None));
        }

        let data = envelope.data.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|err| {
            let failure = Failure::Malformed {
                reason: format!("unexpected payload shape: {err}"),
            };
            self.reject(failure, None)
        })
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Classify, report once, apply the session side effect, build the error.
    pub(crate) fn reject(&self, failure: Failure, cause: Option<reqwest::Error>) -> RequestError {
        let classification = classify(&failure, &self.config.rules);

        match classification.class {
            FailureClass::ServerFault => {
                tracing::error!(class = %classification.class, ?failure, "request failed");
            }
            _ => {
                tracing::warn!(class = %classification.class, ?failure, "request failed");
            }
        }

        self.notifier.notify(Notice::error(classification.notice.clone()));

        if classification.force_logout {
            self.session.logout();
            self.navigator.redirect_to_login();
        }

        RequestError::from_failure(&failure, classification, cause)
    }
}

impl core::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit_auth::MemoryPersistence;

    fn logged_in_store(token: &str) -> SessionStore {
        let seeded = MemoryPersistence::with_raw(format!(
            r#"{{"credential":"{token}","profile":{{"id":1}}}}"#
        ));
        SessionStore::open(Arc::new(seeded))
    }

    #[test]
    fn no_header_without_credential() {
        let store = SessionStore::in_memory();
        let mut headers = HeaderMap::new();
        apply_credential(&mut headers, &store);
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn bearer_header_with_credential() {
        let store = logged_in_store("T1");
        let mut headers = HeaderMap::new();
        apply_credential(&mut headers, &store);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer T1");
    }

    #[test]
    fn outbound_stage_is_idempotent() {
        let store = logged_in_store("T1");
        let mut once = HeaderMap::new();
        apply_credential(&mut once, &store);

        let mut twice = HeaderMap::new();
        twice.insert("x-trace", HeaderValue::from_static("1"));
        apply_credential(&mut twice, &store);
        apply_credential(&mut twice, &store);

        assert_eq!(twice.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(twice.get(AUTHORIZATION), once.get(AUTHORIZATION));
        assert_eq!(twice.get("x-trace").unwrap(), "1");
    }

    #[test]
    fn outbound_stage_follows_logout() {
        let store = logged_in_store("T1");
        store.logout();

        let mut headers = HeaderMap::new();
        apply_credential(&mut headers, &store);
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn request_builder_collects_query_and_body() {
        let req = ApiRequest::get("/user/list").query("page", 2).query("pageSize", 20);
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.query,
            vec![("page".to_string(), "2".to_string()), ("pageSize".to_string(), "20".to_string())]
        );

        let req = ApiRequest::post("/user/send_code").json(&serde_json::json!({ "email": "a@b.c" }));
        assert!(matches!(req.body, RequestBody::Json(ref v) if v["email"] == "a@b.c"));
    }
}
