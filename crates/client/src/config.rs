//! Client configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

pub const ENV_BASE_URL: &str = "ADMINKIT_API_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "ADMINKIT_API_TIMEOUT_MS";
pub const ENV_ACCEPTED_CODES: &str = "ADMINKIT_ACCEPTED_CODES";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("invalid timeout '{0}': expected a positive number of milliseconds")]
    InvalidTimeout(String),

    #[error("invalid accepted code list '{0}'")]
    InvalidCodeList(String),

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Which status/envelope codes map to which failure class.
///
/// Rows may be extended by adding codes; the fallback class is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRules {
    pub session_codes: Vec<i64>,
    pub bad_request_codes: Vec<i64>,
    pub server_fault: RangeInclusive<i64>,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            session_codes: vec![401],
            bad_request_codes: vec![400],
            server_fault: 500..=599,
        }
    }
}

/// Backend address, call deadline and envelope rules.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    /// Envelope codes that count as success.
    pub accepted_codes: Vec<i64>,
    pub rules: ClassificationRules,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: DEFAULT_TIMEOUT,
            accepted_codes: vec![200, 201],
            rules: ClassificationRules::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration from any key/value source. Unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BASE_URL) {
            config.base_url = parse_base_url(&raw)?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if ms == 0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            config.timeout = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(ENV_ACCEPTED_CODES) {
            config.accepted_codes = parse_code_list(&raw)?;
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_accepted_codes(mut self, codes: impl IntoIterator<Item = i64>) -> Self {
        self.accepted_codes = codes.into_iter().collect();
        self
    }

    pub fn accepts(&self, code: i64) -> bool {
        self.accepted_codes.contains(&code)
    }

    /// Absolute URL for an API path.
    ///
    /// Paths are appended to the base address verbatim, so a base of
    /// `https://host/api` and a path of `/user/info` give `https://host/api/user/info`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}

fn parse_code_list(raw: &str) -> Result<Vec<i64>, ConfigError> {
    let codes = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::InvalidCodeList(raw.to_string()))?;

    if codes.is_empty() {
        return Err(ConfigError::InvalidCodeList(raw.to_string()));
    }
    Ok(codes)
}
