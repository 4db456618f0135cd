//! Failure classification.
//!
//! [`classify`] is a pure function from "what went wrong" to "what the pipeline
//! does about it". Displaying the notice and forcing the logout happen in the
//! pipeline; nothing here touches state.

use serde::Serialize;
use thiserror::Error;

use crate::ClassificationRules;

pub const MSG_NETWORK: &str = "Network connection error or request timed out";
pub const MSG_SESSION_EXPIRED: &str = "Session expired, please log in again";
pub const MSG_BAD_REQUEST: &str = "Bad request";
pub const MSG_SERVER_FAULT: &str = "Internal server error";
pub const MSG_REQUEST: &str = "Request error";
pub const MSG_LOGICAL: &str = "Error";
pub const MSG_INVALID_ENVELOPE: &str = "invalid response envelope";

/// What went wrong with a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// No response at all: connection refused, DNS, timeout.
    Unreachable { reason: String },

    /// The transport answered with a non-success HTTP status.
    Status { status: u16, detail: Option<String> },

    /// Transport success, but the envelope code is not an accepted one.
    Logical { code: i64, message: Option<String> },

    /// The response (or the request we tried to build) does not have the
    /// expected shape.
    Malformed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    Network,
    SessionExpired,
    BadRequest,
    ServerFault,
    Request,
}

impl FailureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClass::Network => "network",
            FailureClass::SessionExpired => "session_expired",
            FailureClass::BadRequest => "bad_request",
            FailureClass::ServerFault => "server_fault",
            FailureClass::Request => "request",
        }
    }
}

impl core::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying a [`Failure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub class: FailureClass,
    /// Text shown to the operator.
    pub notice: String,
    /// Whether the session must be cleared and the login view shown.
    pub force_logout: bool,
}

impl Classification {
    fn new(class: FailureClass, notice: impl Into<String>) -> Self {
        Self {
            class,
            notice: notice.into(),
            force_logout: class == FailureClass::SessionExpired,
        }
    }
}

/// Map a failure to its class, notice text and side effects.
pub fn classify(failure: &Failure, rules: &ClassificationRules) -> Classification {
    match failure {
        Failure::Unreachable { .. } => Classification::new(FailureClass::Network, MSG_NETWORK),
        Failure::Status { status, detail } => {
            by_code(i64::from(*status), detail.as_deref(), MSG_REQUEST, rules)
        }
        Failure::Logical { code, message } => by_code(*code, message.as_deref(), MSG_LOGICAL, rules),
        Failure::Malformed { .. } => Classification::new(FailureClass::Request, MSG_REQUEST),
    }
}

fn by_code(
    code: i64,
    detail: Option<&str>,
    fallback: &str,
    rules: &ClassificationRules,
) -> Classification {
    if rules.session_codes.contains(&code) {
        Classification::new(FailureClass::SessionExpired, MSG_SESSION_EXPIRED)
    } else if rules.bad_request_codes.contains(&code) {
        Classification::new(FailureClass::BadRequest, detail.unwrap_or(MSG_BAD_REQUEST))
    } else if rules.server_fault.contains(&code) {
        Classification::new(FailureClass::ServerFault, MSG_SERVER_FAULT)
    } else {
        Classification::new(FailureClass::Request, detail.unwrap_or(fallback))
    }
}

/// A rejected call, as seen by the caller.
///
/// `message` is the text the operator was shown; `detail` keeps whatever the
/// server or transport said.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RequestError {
    pub class: FailureClass,
    /// HTTP status, when the transport answered.
    pub status: Option<u16>,
    /// Envelope code, when an envelope was read.
    pub code: Option<i64>,
    pub message: String,
    pub detail: Option<String>,
    #[source]
    pub cause: Option<reqwest::Error>,
}

impl RequestError {
    pub(crate) fn from_failure(
        failure: &Failure,
        classification: Classification,
        cause: Option<reqwest::Error>,
    ) -> Self {
        let (status, code, detail) = match failure {
            Failure::Unreachable { reason } => (None, None, Some(reason.clone())),
            Failure::Status { status, detail } => (Some(*status), None, detail.clone()),
            Failure::Logical { code, message } => (None, Some(*code), message.clone()),
            Failure::Malformed { reason } => (None, None, Some(reason.clone())),
        };

        Self {
            class: classification.class,
            status,
            code,
            message: classification.notice,
            detail,
            cause,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        self.class == FailureClass::SessionExpired
    }
}
