//! Identifiers as the backend sends them.

use core::convert::Infallible;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Identifier of a console user.
///
/// The backend is free to use numeric keys or opaque strings; both are kept
/// as sent so a round-trip through storage never changes the wire form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(i64),
    Text(String),
}

impl UserId {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            UserId::Numeric(n) => Some(*n),
            UserId::Text(s) => s.parse().ok(),
        }
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserId::Numeric(n) => core::fmt::Display::fmt(n, f),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<i32> for UserId {
    fn from(value: i32) -> Self {
        Self::Numeric(value.into())
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl FromStr for UserId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Text(s.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_ids_keep_their_wire_form() {
        let n: UserId = serde_json::from_str("1").unwrap();
        assert_eq!(n, UserId::Numeric(1));
        assert_eq!(serde_json::to_string(&n).unwrap(), "1");

        let t: UserId = serde_json::from_str("\"u-42\"").unwrap();
        assert_eq!(t, UserId::from("u-42"));
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"u-42\"");
    }

    #[test]
    fn parse_prefers_numeric() {
        assert_eq!("17".parse::<UserId>().unwrap(), UserId::Numeric(17));
        assert_eq!("abc".parse::<UserId>().unwrap().as_i64(), None);
        assert_eq!(UserId::from("9").as_i64(), Some(9));
    }
}
