//! HTTP client implementation
//!
//! This module provides the core HTTP client for the SDK. Authentication is
//! not built in: it comes from the middleware stack the client is composed
//! with. Failed requests are reported, never retried.

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult, GENERIC_FAILURE};
use crate::middleware::{AttachToken, ExtractToken, Middleware};
use crate::token::{redact_body, TokenStore, SECRET_FIELDS};
use reqwest::{header, multipart, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Body of an outgoing request
#[derive(Debug)]
pub enum RequestBody {
    /// No body
    Empty,
    /// Serialized JSON document
    Json(String),
    /// `multipart/form-data` form
    Multipart(multipart::Form),
}

/// A raw response with a 2xx status
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub text: String,
}

impl ApiResponse {
    /// Parse the body, treating an empty body as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> SdkResult<T> {
        let text = if self.text.trim().is_empty() {
            "null"
        } else {
            &self.text
        };
        serde_json::from_str(text).map_err(SdkError::SerializationError)
    }
}

/// The HTTP client for making API requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<SdkConfig>,
    middleware: Arc<Vec<Arc<dyn Middleware>>>,
    /// Body fields masked in release-build logs
    secret_fields: Arc<Vec<String>>,
}

impl HttpClient {
    /// Create a client with the standard stack: attach the stored token to
    /// every request, capture tokens from auth responses per the configured rules.
    pub fn new(config: SdkConfig, tokens: Arc<dyn TokenStore>) -> SdkResult<Self> {
        let stack: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(AttachToken::new(Arc::clone(&tokens))),
            Arc::new(ExtractToken::new(tokens, config.token_rules.clone())),
        ];
        Self::with_middleware(config, stack)
    }

    /// Create a client with an explicit middleware stack.
    pub fn with_middleware(
        config: SdkConfig,
        middleware: Vec<Arc<dyn Middleware>>,
    ) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        // Add custom headers
        for (name, value) in &config.custom_headers {
            if let (Ok(name), Ok(value)) = (
                header::HeaderName::try_from(name.as_str()),
                header::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, value);
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SdkError::NetworkError)?;

        debug!(
            base_url = %config.base_url,
            middleware = ?middleware.iter().map(|m| m.name()).collect::<Vec<_>>(),
            "HTTP client ready"
        );

        let secret_fields = config
            .token_rules
            .iter()
            .map(|rule| rule.field.clone())
            .chain(SECRET_FIELDS.iter().map(|f| f.to_string()))
            .collect();

        Ok(Self {
            client,
            config: Arc::new(config),
            middleware: Arc::new(middleware),
            secret_fields: Arc::new(secret_fields),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        self.execute::<()>(Method::GET, path, RequestBody::Empty, None)
            .await?
            .json()
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> SdkResult<T> {
        self.execute(Method::GET, path, RequestBody::Empty, Some(query))
            .await?
            .json()
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> SdkResult<T> {
        self.post_raw(path, body).await?.json()
    }

    /// Make a POST request with a JSON body, returning the raw response
    pub async fn post_raw<B: Serialize>(&self, path: &str, body: &B) -> SdkResult<ApiResponse> {
        let body = RequestBody::Json(serde_json::to_string(body)?);
        self.execute::<()>(Method::POST, path, body, None).await
    }

    /// Make a multipart POST request, returning the raw response
    pub async fn post_multipart(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> SdkResult<ApiResponse> {
        self.execute::<()>(Method::POST, path, RequestBody::Multipart(form), None)
            .await
    }

    /// Send one request through the middleware stack.
    ///
    /// Non-2xx responses become [`SdkError::ApiError`] carrying the status and raw body.
    pub async fn execute<Q: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        query: Option<&Q>,
    ) -> SdkResult<ApiResponse> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);

        if let Some(q) = query {
            request = request.query(q);
        }

        match body {
            RequestBody::Empty => {}
            RequestBody::Json(json) => {
                if self.config.enable_logging {
                    debug!("Request body: {}", redact_body(&json, &self.secret_fields));
                }
                request = request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(json);
            }
            RequestBody::Multipart(form) => {
                if self.config.enable_logging {
                    debug!("Request body: multipart form (boundary {})", form.boundary());
                }
                request = request.multipart(form);
            }
        }

        for middleware in self.middleware.iter() {
            request = middleware.on_request(request)?;
        }

        debug!("Request: {} {}", method, url);

        let response = request.send().await.map_err(|e| {
            error!("Request failed: {} {}: {}", method, url, e);
            if e.is_timeout() {
                SdkError::Timeout(self.config.timeout.as_secs())
            } else {
                SdkError::NetworkError(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(SdkError::NetworkError)?;

        debug!("Response: {} {} -> {}", method, url, status);
        if self.config.enable_logging {
            debug!("Response body: {}", redact_body(&text, &self.secret_fields));
        }

        if !status.is_success() {
            error!("{} {} failed with status {}", method, url, status);
            return Err(SdkError::from_response(status.as_u16(), &text, GENERIC_FAILURE));
        }

        let parsed = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
        for middleware in self.middleware.iter() {
            middleware.on_response(status, &parsed)?;
        }

        Ok(ApiResponse { status, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenRule;
    use crate::token::MemoryTokenStore;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(SdkConfig::new(base), Arc::new(MemoryTokenStore::new())).unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = client("http://localhost:8000/api/v1/");

        assert_eq!(client.url("tasks/"), "http://localhost:8000/api/v1/tasks/");
        assert_eq!(client.url("/tasks/7/"), "http://localhost:8000/api/v1/tasks/7/");
        assert_eq!(
            client.url("submissions"),
            "http://localhost:8000/api/v1/submissions"
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = HttpClient::new(SdkConfig::new(""), Arc::new(MemoryTokenStore::new()));
        assert!(matches!(result, Err(SdkError::ConfigurationError(_))));
    }

    #[test]
    fn test_secret_fields_cover_token_rules_and_passwords() {
        let config = SdkConfig::default().with_token_rules(vec![TokenRule::new(201, "jwt")]);
        let client = HttpClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap();

        for field in ["jwt", "password", "confirmPassword"] {
            assert!(client.secret_fields.iter().any(|f| f == field), "{} not masked", field);
        }
    }

    #[test]
    fn test_empty_body_parses_as_null() {
        let response = ApiResponse {
            status: StatusCode::CREATED,
            text: String::new(),
        };
        let value: Value = response.json().unwrap();
        assert_eq!(value, Value::Null);
    }
}
