//! Codejudge SDK
//!
//! This crate provides a Rust SDK for the Codejudge online judge API: account
//! registration and login, browsing and authoring tasks, and submitting
//! solutions for grading.
//!
//! # Features
//!
//! - **Pluggable token storage**: the session token lives behind [`TokenStore`]
//! - **Middleware stack**: bearer token attachment and token capture are
//!   composed into the client when it is built
//! - **Local validation**: task and account forms are checked before any request
//! - **Paging**: [`TaskListPager`] tracks the catalog view state
//! - **Single-flight submissions**: a second submission while one is pending
//!   is rejected locally
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use codejudge_sdk::{JudgeClient, MemoryTokenStore, SdkConfig};
//! use codejudge_core::{Language, LoginForm, TaskId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JudgeClient::new(SdkConfig::default(), Arc::new(MemoryTokenStore::new()))?;
//!
//!     client
//!         .auth()
//!         .login(&LoginForm::new("ada@example.com", "hunter2"))
//!         .await?;
//!
//!     let verdict = client
//!         .submissions()
//!         .submit(TaskId(7), Language::Python, "print(input())")
//!         .await?;
//!     println!("{}", verdict.message());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use codejudge_sdk::{JudgeClient, SdkError};
//! use codejudge_core::TaskForm;
//!
//! async fn author(client: &JudgeClient, form: &TaskForm) {
//!     match client.tasks().create_from_form(form).await {
//!         Ok(_) => println!("Task created"),
//!         Err(SdkError::ValidationError(errors)) => {
//!             for (field, message) in errors.iter() {
//!                 eprintln!("{}: {}", field, message);
//!             }
//!         }
//!         Err(e) => eprintln!("{}", e.user_message()),
//!     }
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pager;
pub mod resources;
pub mod token;

// Re-export main types for convenience
pub use client::{ApiResponse, HttpClient, RequestBody};
pub use config::{SdkConfig, SdkConfigBuilder, TokenRule, DEFAULT_BASE_URL};
pub use error::{SdkError, SdkResult};
pub use middleware::{AttachToken, ExtractToken, Middleware};
pub use pager::{PageRequest, TaskListPager, TaskSource};
pub use resources::{AuthClient, SubmissionsClient, TasksClient};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

use codejudge_core::PageSize;
use std::sync::Arc;

/// The main client for the Codejudge API.
///
/// All resource clients share one HTTP client, one token store and one
/// submission in-flight flag.
///
/// # Example
///
/// ```rust,no_run
/// use codejudge_sdk::{JudgeClient, MemoryTokenStore};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = JudgeClient::builder("http://localhost:8000/api/v1/")
///     .with_timeout(std::time::Duration::from_secs(10))
///     .build(Arc::new(MemoryTokenStore::new()))?;
///
/// let pager = client.task_pager(codejudge_core::PageSize::Twenty);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JudgeClient {
    http_client: Arc<HttpClient>,
    tokens: Arc<dyn TokenStore>,
    auth: AuthClient,
    tasks: TasksClient,
    submissions: SubmissionsClient,
}

impl JudgeClient {
    /// Create a client whose middleware reads and writes `tokens`.
    pub fn new(config: SdkConfig, tokens: Arc<dyn TokenStore>) -> SdkResult<Self> {
        let http_client = Arc::new(HttpClient::new(config, Arc::clone(&tokens))?);

        Ok(Self {
            auth: AuthClient::new(Arc::clone(&http_client), Arc::clone(&tokens)),
            tasks: TasksClient::new(Arc::clone(&http_client)),
            submissions: SubmissionsClient::new(Arc::clone(&http_client)),
            tokens,
            http_client,
        })
    }

    /// Start a fluent configuration for the given base URL.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Registration, login and logout.
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Catalog and authoring.
    pub fn tasks(&self) -> &TasksClient {
        &self.tasks
    }

    /// Solution uploads.
    pub fn submissions(&self) -> &SubmissionsClient {
        &self.submissions
    }

    /// The store the middleware reads the session token from.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// A fresh catalog view starting at the first page.
    pub fn task_pager(&self, page_size: PageSize) -> TaskListPager<TasksClient> {
        TaskListPager::new(self.tasks.clone(), page_size)
    }

    /// Get a reference to the underlying HTTP client.
    ///
    /// This is useful for making custom requests not covered by the resource clients.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Get the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.http_client.config().base_url
    }
}

/// Builder for creating a [`JudgeClient`] with fluent configuration.
#[derive(Debug)]
pub struct ClientBuilder {
    config_builder: SdkConfigBuilder,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config_builder: SdkConfig::builder(base_url),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.connect_timeout(timeout);
        self
    }

    /// Enable or disable request/response body logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config_builder = self.config_builder.logging(enable);
        self
    }

    /// Add a custom header to all requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Replace the token capture rules.
    pub fn with_token_rules(mut self, rules: Vec<TokenRule>) -> Self {
        self.config_builder = self.config_builder.token_rules(rules);
        self
    }

    /// Build the client around `tokens`.
    pub fn build(self, tokens: Arc<dyn TokenStore>) -> SdkResult<JudgeClient> {
        JudgeClient::new(self.config_builder.build(), tokens)
    }
}
