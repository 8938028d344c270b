//! API key handling and default request headers

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use crate::common::errors::{AcisError, Result};

/// Default User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("acis-rust-sdk/", env!("CARGO_PKG_VERSION"));

/// An ACIS API key
///
/// The key never appears in `Debug` output, so clients and configs holding
/// it can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting empty or whitespace-only values
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(AcisError::Authentication {
                message: "API key is required".to_string(),
                status_code: None,
                response: None,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Build the header set attached to every request
///
/// Includes the bearer token, JSON content negotiation and the user agent.
pub fn default_headers(api_key: &ApiKey, user_agent: &str) -> Result<HeaderMap> {
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.expose()))
        .map_err(|_| AcisError::Authentication {
            message: "API key contains characters not allowed in a header".to_string(),
            status_code: None,
            response: None,
        })?;
    bearer.set_sensitive(true);

    let agent = HeaderValue::from_str(user_agent)
        .map_err(|e| AcisError::Configuration(format!("Invalid user agent: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, agent);
    Ok(headers)
}
