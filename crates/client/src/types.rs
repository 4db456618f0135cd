//! Request/response payloads of the console endpoints.

use serde::{Deserialize, Serialize};

/// Page selector for listing endpoints (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl PageQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "list", alias = "records", alias = "rows")]
    pub items: Vec<T>,

    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default, rename = "pageSize")]
    pub page_size: Option<u32>,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Serialize)]
pub struct PasswordChange {
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

impl PasswordChange {
    pub fn new(old_password: impl Into<String>, new_password: impl Into<String>) -> Self {
        Self {
            old_password: old_password.into(),
            new_password: new_password.into(),
        }
    }
}

impl core::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct VerificationCodeRequest<'a> {
    pub email: &'a str,
}
