//! Submissions resource client
//!
//! Uploads a solution as `multipart/form-data` and reads back the verdict.

use crate::client::HttpClient;
use crate::error::{SdkError, SdkResult};
use codejudge_core::{Language, SubmissionResponse, TaskId, Verdict};
use reqwest::multipart::{Form, Part};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Message used when a failed submission response says nothing useful
pub const SUBMISSION_FAILED: &str = "Submission failed";

/// Client for submitting solutions
///
/// Clones share the in-flight flag, so at most one submission per client
/// family is outstanding at any time.
#[derive(Debug, Clone)]
pub struct SubmissionsClient {
    client: Arc<HttpClient>,
    submitting: Arc<AtomicBool>,
}

/// Clears the in-flight flag however the submission ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SubmissionsClient {
    /// Create a new submissions client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is currently in flight
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Submit `source_code` for `task_id`.
    ///
    /// A call made while another is pending fails with
    /// [`SdkError::SubmissionInProgress`] without contacting the server.
    pub async fn submit(
        &self,
        task_id: TaskId,
        language: Language,
        source_code: impl Into<String>,
    ) -> SdkResult<Verdict> {
        let Some(_guard) = InFlight::acquire(&self.submitting) else {
            warn!(task = %task_id, "submission rejected, another one is in flight");
            return Err(SdkError::SubmissionInProgress);
        };

        let form = build_form(task_id, language, source_code.into())?;
        let response = self
            .client
            .post_multipart("submissions", form)
            .await
            .map_err(|e| {
                error!(task = %task_id, "Submission failed: {}", e);
                e.for_operation(SUBMISSION_FAILED)
            })?;

        // A body without a readable status still means the server took it.
        let verdict = response
            .json::<Option<SubmissionResponse>>()
            .ok()
            .flatten()
            .unwrap_or_default()
            .verdict();
        info!(task = %task_id, language = %language, ?verdict, "submission graded");
        Ok(verdict)
    }
}

/// The multipart body: `file` (named `solution.<ext>`), `task`, `language`.
pub fn build_form(task_id: TaskId, language: Language, source_code: String) -> SdkResult<Form> {
    let file = Part::text(source_code)
        .file_name(language.file_name())
        .mime_str("text/plain")?;

    Ok(Form::new()
        .part("file", file)
        .text("task", task_id.to_string())
        .text("language", language.as_str()))
}
