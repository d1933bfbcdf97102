//! SDK error types and handling
//!
//! Every failure the SDK can report: local validation problems that never
//! reach the network, transport failures, and non-2xx API responses.

use codejudge_core::FieldErrors;
use thiserror::Error;

/// Fallback message when an error response carries nothing usable.
pub const GENERIC_FAILURE: &str = "Request failed";

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// API returned a non-2xx (or unexpected) response
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        body: String,
    },

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// An operation got no response at all; `source` holds the transport error
    #[error("{message}")]
    RequestFailed {
        message: String,
        #[source]
        source: Box<SdkError>,
    },

    /// Form input failed local validation
    #[error("Validation error: {0}")]
    ValidationError(FieldErrors),

    /// Raw input could not be parsed at all; submission is blocked
    #[error("Malformed input: {message}")]
    MalformedInput {
        message: String,
        errors: FieldErrors,
    },

    /// A submission is already in flight on this client
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// Reading or writing the session token failed
    #[error("Token store error: {0}")]
    TokenStore(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

impl SdkError {
    /// Build an API error from a response.
    ///
    /// The message is taken from the body's `detail`, then `message`, then
    /// the status reason phrase, then `fallback`.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        SdkError::ApiError {
            status,
            message: extract_message(status, body, fallback),
            body: body.to_string(),
        }
    }

    /// Restate a failed request in terms of the operation that sent it.
    ///
    /// API errors take `fallback` when the body says nothing useful;
    /// transport failures, which have no body at all, become `fallback`.
    pub fn for_operation(self, fallback: &str) -> Self {
        match self {
            SdkError::ApiError { status, body, .. } => {
                SdkError::from_response(status, &body, fallback)
            }
            SdkError::NetworkError(_) | SdkError::Timeout(_) => SdkError::RequestFailed {
                message: fallback.to_string(),
                source: Box::new(self),
            },
            other => other,
        }
    }

    /// Text suitable for a non-blocking alert.
    pub fn user_message(&self) -> String {
        match self {
            SdkError::ApiError { message, .. } => message.clone(),
            SdkError::ValidationError(errors) => errors.to_string(),
            SdkError::MalformedInput { message, .. } => message.clone(),
            SdkError::RequestFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Field errors for inline display, if this is a local validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SdkError::ValidationError(errors) => Some(errors),
            SdkError::MalformedInput { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::ApiError { status, .. } => Some(*status),
            SdkError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            SdkError::RequestFailed { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401) | Some(403))
    }

    /// Local errors never left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SdkError::ValidationError(_)
                | SdkError::MalformedInput { .. }
                | SdkError::SubmissionInProgress
                | SdkError::ConfigurationError(_)
        )
    }
}

fn extract_message(status: u16, body: &str, fallback: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    field("detail")
        .or_else(|| field("message"))
        .or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefers_detail() {
        let body = r#"{"detail": "Invalid token", "message": "other"}"#;
        let error = SdkError::from_response(401, body, GENERIC_FAILURE);
        assert_eq!(error.user_message(), "Invalid token");
        assert_eq!(error.status_code(), Some(401));
        assert!(error.is_unauthorized());
    }

    #[test]
    fn test_message_falls_back_to_message_field() {
        let body = r#"{"message": "Title already taken"}"#;
        let error = SdkError::from_response(400, body, GENERIC_FAILURE);
        assert_eq!(error.user_message(), "Title already taken");
    }

    #[test]
    fn test_message_falls_back_to_status_text() {
        let error = SdkError::from_response(502, "<html>bad gateway</html>", GENERIC_FAILURE);
        assert_eq!(error.user_message(), "Bad Gateway");
    }

    #[test]
    fn test_message_generic_fallback() {
        let error = SdkError::from_response(599, "", "Submission failed");
        assert_eq!(error.user_message(), "Submission failed");
    }

    #[test]
    fn test_raw_body_is_kept() {
        let error = SdkError::from_response(500, "boom", GENERIC_FAILURE);
        match error {
            SdkError::ApiError { body, .. } => assert_eq!(body, "boom"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_transport_failure_takes_operation_fallback() {
        let error = SdkError::Timeout(30).for_operation("Submission failed");
        assert_eq!(error.user_message(), "Submission failed");
        assert!(!error.is_local());

        let source = std::error::Error::source(&error).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Request timed out after 30 seconds"));
    }

    #[test]
    fn test_api_error_keeps_server_message_for_operation() {
        let error = SdkError::from_response(400, r#"{"message": "Bad file"}"#, GENERIC_FAILURE)
            .for_operation("Submission failed");
        assert_eq!(error.user_message(), "Bad file");

        let error = SdkError::from_response(599, "", GENERIC_FAILURE).for_operation("Submission failed");
        assert_eq!(error.user_message(), "Submission failed");
    }

    #[test]
    fn test_local_errors() {
        assert!(SdkError::SubmissionInProgress.is_local());
        assert!(SdkError::ValidationError(FieldErrors::new()).is_local());
        assert!(!SdkError::Timeout(30).is_local());
    }
}
