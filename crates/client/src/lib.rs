//! `adminkit-client`: the request pipeline between the console and its backend.
//!
//! Every backend call goes through [`RequestPipeline`]:
//! - the outbound stage attaches the session credential;
//! - the inbound stage unwraps the `{ code, message, data }` envelope;
//! - failures are classified by a pure function ([`classify`]) and reported
//!   once through the injected [`Notifier`];
//! - a session failure clears the [`SessionStore`](adminkit_auth::SessionStore)
//!   and asks the [`Navigator`](adminkit_core::Navigator) for the login view.
//!
//! Typed endpoint bindings ([`UserApi`], [`UploadApi`]) sit on top.

pub mod api;
pub mod config;
pub mod envelope;
pub mod failure;
pub mod notify;
pub mod pipeline;
pub mod types;
pub mod upload;

pub use api::UserApi;
pub use config::{ClassificationRules, ClientConfig, ConfigError};
pub use envelope::Envelope;
pub use failure::{Classification, Failure, FailureClass, RequestError, classify};
pub use notify::{MemoryNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use pipeline::{ApiRequest, RequestBody, RequestPipeline, apply_credential};
pub use types::{Page, PageQuery, PasswordChange};
pub use upload::{UploadApi, UploadedFile};
