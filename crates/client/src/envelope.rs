//! The `{ code, message, data }` wrapper every backend response uses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Just the message of an error body; anything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best-effort extraction of a server-supplied detail.
    pub(crate) fn detail(bytes: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(bytes)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn data_and_message_are_optional() {
        let env: Envelope<Value> = serde_json::from_value(json!({ "code": 401 })).unwrap();
        assert_eq!(env.code, 401);
        assert!(env.message.is_none());
        assert!(env.data.is_none());
    }

    #[test]
    fn error_detail_ignores_blank_or_foreign_bodies() {
        assert_eq!(
            ErrorBody::detail(br#"{"code":400,"message":"page must be positive"}"#).as_deref(),
            Some("page must be positive")
        );
        assert_eq!(ErrorBody::detail(br#"{"message":"  "}"#), None);
        assert_eq!(ErrorBody::detail(b"<html>502</html>"), None);
    }
}
