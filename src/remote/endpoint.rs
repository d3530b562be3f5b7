//! Endpoint configuration and its pre-flight validation.

use reqwest::Url;
use std::fmt;

use crate::error::ConfigError;

/// Value shipped in setup instructions before a real deployment URL is pasted in.
pub const PLACEHOLDER_ENDPOINT: &str = "YOUR_APPS_SCRIPT_WEB_APP_URL_HERE";

/// Every Apps Script web app is served from under this prefix.
pub const APPS_SCRIPT_PREFIX: &str = "https://script.google.com/";

/// The endpoint as configured by the user; not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: String,
    pub allowed_prefix: String,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            allowed_prefix: APPS_SCRIPT_PREFIX.to_string(),
        }
    }

    pub fn with_allowed_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.allowed_prefix = prefix.into();
        self
    }

    /// Checks the configured URL before any request is made.
    pub fn validate(&self) -> Result<Endpoint, ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Missing);
        }
        if url == PLACEHOLDER_ENDPOINT {
            return Err(ConfigError::Placeholder);
        }
        if !url.starts_with(&self.allowed_prefix) {
            return Err(ConfigError::UnexpectedPrefix {
                url: url.to_string(),
                expected: self.allowed_prefix.clone(),
            });
        }
        let parsed = Url::parse(url).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Ok(Endpoint(parsed))
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new(PLACEHOLDER_ENDPOINT)
    }
}

/// A validated endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(Url);

impl Endpoint {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
