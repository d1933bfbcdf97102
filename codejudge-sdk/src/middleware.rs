//! Request/response middleware
//!
//! The HTTP client runs every outgoing request through each middleware's
//! [`Middleware::on_request`] in order, and every successful response
//! through [`Middleware::on_response`]. The stack is fixed when the client
//! is built.

use crate::config::TokenRule;
use crate::error::SdkResult;
use crate::token::{is_usable_token, redact, TokenStore};
use reqwest::{header, RequestBuilder, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A step in the client's request pipeline.
pub trait Middleware: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Adjust an outgoing request.
    fn on_request(&self, request: RequestBuilder) -> SdkResult<RequestBuilder> {
        Ok(request)
    }

    /// Observe a 2xx response. `body` is `Value::Null` when the body is not JSON.
    fn on_response(&self, _status: StatusCode, _body: &Value) -> SdkResult<()> {
        Ok(())
    }
}

/// Adds `Authorization: Bearer <token>` when the store holds a usable token.
#[derive(Debug, Clone)]
pub struct AttachToken {
    store: Arc<dyn TokenStore>,
}

impl AttachToken {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// The header value that would be attached right now, if any.
    pub fn authorization(&self) -> Option<String> {
        match self.store.get() {
            Ok(Some(token)) if is_usable_token(&token) => Some(format!("Bearer {}", token)),
            Ok(_) => None,
            Err(e) => {
                warn!("Could not read session token, sending unauthenticated: {}", e);
                None
            }
        }
    }
}

impl Middleware for AttachToken {
    fn name(&self) -> &'static str {
        "attach-token"
    }

    fn on_request(&self, request: RequestBuilder) -> SdkResult<RequestBuilder> {
        match self.authorization() {
            Some(value) => {
                debug!(token = %redact(value.trim_start_matches("Bearer ")), "attaching bearer token");
                Ok(request.header(header::AUTHORIZATION, value))
            }
            None => {
                debug!("no session token, sending unauthenticated");
                Ok(request)
            }
        }
    }
}

/// Stores the session token found in auth responses.
///
/// Rules are tried in order; the first whose status equals the response
/// status decides. Later rules are not consulted even if the field is absent.
#[derive(Debug, Clone)]
pub struct ExtractToken {
    store: Arc<dyn TokenStore>,
    rules: Vec<TokenRule>,
}

impl ExtractToken {
    pub fn new(store: Arc<dyn TokenStore>, rules: Vec<TokenRule>) -> Self {
        Self { store, rules }
    }

    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// The token the rule table selects for this response, if any.
    pub fn select<'a>(&self, status: StatusCode, body: &'a Value) -> Option<&'a str> {
        let rule = self.rules.iter().find(|r| r.status == status.as_u16())?;
        body.get(&rule.field)
            .and_then(Value::as_str)
            .filter(|token| is_usable_token(token))
    }
}

impl Middleware for ExtractToken {
    fn name(&self) -> &'static str {
        "extract-token"
    }

    fn on_response(&self, status: StatusCode, body: &Value) -> SdkResult<()> {
        if let Some(token) = self.select(status, body) {
            self.store.set(token)?;
            debug!(token = %redact(token), status = status.as_u16(), "session token saved");
        }
        Ok(())
    }
}
