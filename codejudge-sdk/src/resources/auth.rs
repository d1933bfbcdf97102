//! Account resource client
//!
//! Registration and login. The session token itself is captured by the
//! client's extract-token middleware, not here.

use crate::client::HttpClient;
use crate::error::{SdkError, SdkResult};
use crate::token::{is_usable_token, TokenStore};
use codejudge_core::{LoginForm, RegisterForm};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Client for account operations
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Arc<HttpClient>,
    tokens: Arc<dyn TokenStore>,
}

impl AuthClient {
    /// Create a new auth client
    pub fn new(client: Arc<HttpClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { client, tokens }
    }

    /// Register a new account. The form is checked locally first.
    pub async fn register(&self, form: &RegisterForm) -> SdkResult<()> {
        form.check().map_err(SdkError::ValidationError)?;
        let _: Value = self.client.post("users/register/", form).await?;
        info!(username = %form.username, "account registered");
        Ok(())
    }

    /// Log in.
    ///
    /// Returns whether the token store holds a session token afterwards. A
    /// successful response whose shape matches none of the configured token
    /// rules leaves the store untouched.
    pub async fn login(&self, form: &LoginForm) -> SdkResult<bool> {
        form.check().map_err(SdkError::ValidationError)?;
        let response = self.client.post_raw("users/login/", form).await?;

        let authenticated = self.is_authenticated()?;
        if authenticated {
            info!(email = %form.email, "logged in");
        } else {
            warn!(
                status = response.status.as_u16(),
                "login succeeded but no token matched the configured rules"
            );
        }
        Ok(authenticated)
    }

    /// Forget the session token.
    pub fn logout(&self) -> SdkResult<()> {
        self.tokens.clear()?;
        info!("session token cleared");
        Ok(())
    }

    /// Whether a usable session token is stored.
    pub fn is_authenticated(&self) -> SdkResult<bool> {
        Ok(self
            .tokens
            .get()?
            .map(|t| is_usable_token(&t))
            .unwrap_or(false))
    }
}
