//! Tasks resource client
//!
//! This module provides methods for browsing and authoring tasks.

use crate::client::HttpClient;
use crate::error::{SdkError, SdkResult};
use crate::pager::TaskSource;
use async_trait::async_trait;
use codejudge_core::{
    validate_task, CreateTaskPayload, PageQuery, Task, TaskForm, TaskId, TaskPage,
    TaskValidationError,
};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Message used when a failed creation response says nothing useful
pub const CREATE_FAILED: &str = "Failed to create task";

/// Client for task operations
#[derive(Debug, Clone)]
pub struct TasksClient {
    client: Arc<HttpClient>,
}

impl TasksClient {
    /// Create a new tasks client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// List one page of the catalog. `query.page` is one-based.
    pub async fn list(&self, query: PageQuery) -> SdkResult<TaskPage> {
        self.client.get_with_query("tasks/", &query).await
    }

    /// Get a task by ID, including its test cases
    pub async fn get(&self, id: TaskId) -> SdkResult<Task> {
        self.client.get(&format!("tasks/{}/", id)).await
    }

    /// Create a task from an already normalized payload.
    ///
    /// Only `201 Created` counts as success. The created task is returned
    /// when the server echoes it back.
    pub async fn create(&self, payload: &CreateTaskPayload) -> SdkResult<Option<Task>> {
        let response = self.client.post_raw("tasks/", payload).await.map_err(|e| {
            error!("Task creation failed: {}", e);
            e.for_operation(CREATE_FAILED)
        })?;

        if response.status != StatusCode::CREATED {
            let message = response
                .json::<Value>()
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| CREATE_FAILED.to_string());
            error!(status = response.status.as_u16(), "Task creation not confirmed: {}", message);
            return Err(SdkError::ApiError {
                status: response.status.as_u16(),
                message,
                body: response.text,
            });
        }

        info!(title = %payload.title, "task created");
        Ok(response.json::<Task>().ok())
    }

    /// Validate the raw authoring form, then create the task.
    ///
    /// Invalid input never reaches the network.
    pub async fn create_from_form(&self, form: &TaskForm) -> SdkResult<Option<Task>> {
        let payload = validate_task(form).map_err(|e| match e {
            TaskValidationError::MalformedTestCases(errors) => SdkError::MalformedInput {
                message: "Test cases must be valid JSON".to_string(),
                errors,
            },
            TaskValidationError::Invalid(errors) => SdkError::ValidationError(errors),
        })?;
        self.create(&payload).await
    }
}

#[async_trait]
impl TaskSource for TasksClient {
    async fn fetch_page(&self, query: PageQuery) -> SdkResult<TaskPage> {
        self.list(query).await
    }
}
