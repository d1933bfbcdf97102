//! SDK configuration
//!
//! This module provides configuration options for the SDK client.

use crate::error::{SdkError, SdkResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API base URL of a locally running judge server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1/";

/// Configuration for the SDK client
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Base URL for the API
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Log request and response bodies at debug level
    pub enable_logging: bool,

    /// Custom headers to add to all requests
    pub custom_headers: Vec<(String, String)>,

    /// Ordered rules for capturing a session token from auth responses
    pub token_rules: Vec<TokenRule>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("codejudge-sdk/{}", env!("CARGO_PKG_VERSION")),
            enable_logging: false,
            custom_headers: Vec::new(),
            token_rules: TokenRule::defaults(),
        }
    }
}

impl SdkConfig {
    /// Create a new configuration with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create a new builder with the given base URL
    pub fn builder(base_url: impl Into<String>) -> SdkConfigBuilder {
        SdkConfigBuilder {
            config: Self::new(base_url),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable request/response body logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Add a custom header to all requests
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Replace the token extraction rules
    pub fn with_token_rules(mut self, rules: Vec<TokenRule>) -> Self {
        self.token_rules = rules;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SdkResult<()> {
        if self.base_url.is_empty() {
            return Err(SdkError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        // Validate URL format
        url::Url::parse(&self.base_url)?;

        if self.timeout.is_zero() {
            return Err(SdkError::ConfigurationError(
                "Timeout cannot be zero".to_string(),
            ));
        }

        for rule in &self.token_rules {
            if !(200..300).contains(&rule.status) {
                return Err(SdkError::ConfigurationError(format!(
                    "Token rule status {} is not a success status",
                    rule.status
                )));
            }
            if rule.field.is_empty() {
                return Err(SdkError::ConfigurationError(
                    "Token rule field cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Captures the session token from a successful response.
///
/// When a response's status equals `status`, the string at `field` in the
/// JSON body is stored as the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRule {
    pub status: u16,
    pub field: String,
}

impl TokenRule {
    pub fn new(status: u16, field: impl Into<String>) -> Self {
        Self {
            status,
            field: field.into(),
        }
    }

    /// Both auth-response contracts seen from the judge backend:
    /// `200` with `access`, and `201` with `token`.
    pub fn defaults() -> Vec<TokenRule> {
        vec![TokenRule::new(200, "access"), TokenRule::new(201, "token")]
    }
}

/// Builder for SDK configuration
#[derive(Debug, Default)]
pub struct SdkConfigBuilder {
    config: SdkConfig,
}

impl SdkConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Enable logging
    pub fn logging(mut self, enable: bool) -> Self {
        self.config.enable_logging = enable;
        self
    }

    /// Add a custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Append a token extraction rule after the existing ones
    pub fn token_rule(mut self, status: u16, field: impl Into<String>) -> Self {
        self.config.token_rules.push(TokenRule::new(status, field));
        self
    }

    /// Replace all token extraction rules
    pub fn token_rules(mut self, rules: Vec<TokenRule>) -> Self {
        self.config.token_rules = rules;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SdkConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SdkConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token_rules, TokenRule::defaults());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SdkConfigBuilder::new()
            .base_url("https://judge.example.com/api/v1/")
            .timeout(Duration::from_secs(60))
            .token_rules(vec![TokenRule::new(201, "token")])
            .build();

        assert_eq!(config.base_url, "https://judge.example.com/api/v1/");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.token_rules.len(), 1);
    }

    #[test]
    fn test_invalid_config() {
        assert!(SdkConfig::new("").validate().is_err());
        assert!(SdkConfig::new("not a url").validate().is_err());
        assert!(SdkConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_token_rule_must_be_success_status() {
        let config = SdkConfig::default().with_token_rules(vec![TokenRule::new(401, "access")]);
        assert!(matches!(
            config.validate(),
            Err(SdkError::ConfigurationError(_))
        ));
    }
}
