//! Task-authoring validation.
//!
//! [`validate_task`] runs every rule against the raw [`TaskForm`] so the form
//! can flag all offending fields at once, then normalizes the input into the
//! [`CreateTaskPayload`] accepted by `POST tasks/`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::domain::task::{Difficulty, DifficultyRef, NewTestCase, Tag};
use crate::validation::field_errors::FieldErrors;

pub const DEFAULT_TIME_LIMIT: &str = "2";
pub const DEFAULT_MEMORY_LIMIT: &str = "256";

/// Fields of the authoring form, named as the form names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Title,
    Description,
    InputFormat,
    OutputFormat,
    Difficulty,
    TimeLimit,
    MemoryLimit,
    Tags,
    TestCases,
}

impl TaskField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::Description => "description",
            TaskField::InputFormat => "inputFormat",
            TaskField::OutputFormat => "outputFormat",
            TaskField::Difficulty => "difficulty",
            TaskField::TimeLimit => "timeLimit",
            TaskField::MemoryLimit => "memoryLimit",
            TaskField::Tags => "tags",
            TaskField::TestCases => "testCases",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw authoring form state. Every field is kept as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub input_format: String,
    pub output_format: String,
    pub difficulty: String,
    pub time_limit: String,
    pub memory_limit: String,
    /// JSON array of `{input_data, expected_output}` objects.
    pub test_cases: String,
    /// Comma-separated tag names.
    pub tags: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            input_format: String::new(),
            output_format: String::new(),
            difficulty: String::new(),
            time_limit: DEFAULT_TIME_LIMIT.to_string(),
            memory_limit: DEFAULT_MEMORY_LIMIT.to_string(),
            test_cases: String::new(),
            tags: String::new(),
        }
    }
}

impl TaskForm {
    /// Updates one field and drops its stale error message.
    pub fn set(&mut self, field: TaskField, value: impl Into<String>, errors: &mut FieldErrors) {
        let value = value.into();
        match field {
            TaskField::Title => self.title = value,
            TaskField::Description => self.description = value,
            TaskField::InputFormat => self.input_format = value,
            TaskField::OutputFormat => self.output_format = value,
            TaskField::Difficulty => self.difficulty = value,
            TaskField::TimeLimit => self.time_limit = value,
            TaskField::MemoryLimit => self.memory_limit = value,
            TaskField::Tags => self.tags = value,
            TaskField::TestCases => self.test_cases = value,
        }
        errors.clear_field(field.as_str());
    }
}

/// Body of `POST tasks/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskPayload {
    pub title: String,
    pub description: String,
    pub input_format: String,
    pub output_format: String,
    pub difficulty: DifficultyRef,
    pub time_limit: i64,
    pub memory_limit: i64,
    pub testcases: Vec<NewTestCase>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    /// One or more fields are invalid; shown inline next to each field.
    #[error("Task form is invalid: {0}")]
    Invalid(FieldErrors),

    /// The test-case text is not JSON at all. The form blocks submission
    /// with an alert in addition to the inline errors.
    #[error("Test cases must be valid JSON")]
    MalformedTestCases(FieldErrors),
}

impl TaskValidationError {
    pub fn field_errors(&self) -> &FieldErrors {
        match self {
            TaskValidationError::Invalid(errors) => errors,
            TaskValidationError::MalformedTestCases(errors) => errors,
        }
    }

    pub fn into_field_errors(self) -> FieldErrors {
        match self {
            TaskValidationError::Invalid(errors) => errors,
            TaskValidationError::MalformedTestCases(errors) => errors,
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, TaskValidationError::MalformedTestCases(_))
    }
}

enum TestCaseError {
    Malformed,
    Invalid(String),
}

/// Validates the form and builds the creation payload.
pub fn validate_task(form: &TaskForm) -> Result<CreateTaskPayload, TaskValidationError> {
    let mut errors = FieldErrors::new();

    if form.title.trim().is_empty() {
        errors.insert(TaskField::Title.as_str(), "Title is required");
    }
    if form.description.trim().is_empty() {
        errors.insert(TaskField::Description.as_str(), "Description is required");
    }

    let difficulty = match parse_difficulty(&form.difficulty) {
        Ok(difficulty) => Some(difficulty),
        Err(message) => {
            errors.insert(TaskField::Difficulty.as_str(), message);
            None
        }
    };

    let time_limit = positive_integer(&form.time_limit);
    if time_limit.is_none() {
        errors.insert(
            TaskField::TimeLimit.as_str(),
            "Time limit must be a whole number greater than 0",
        );
    }
    let memory_limit = positive_integer(&form.memory_limit);
    if memory_limit.is_none() {
        errors.insert(
            TaskField::MemoryLimit.as_str(),
            "Memory limit must be a whole number greater than 0",
        );
    }

    let tags = parse_tags(&form.tags);
    if tags.is_empty() {
        errors.insert(TaskField::Tags.as_str(), "At least one tag is required");
    }

    let mut malformed = false;
    let test_cases = match parse_test_cases(&form.test_cases) {
        Ok(test_cases) => Some(test_cases),
        Err(TestCaseError::Malformed) => {
            malformed = true;
            errors.insert(TaskField::TestCases.as_str(), "Test cases must be valid JSON");
            None
        }
        Err(TestCaseError::Invalid(message)) => {
            errors.insert(TaskField::TestCases.as_str(), message);
            None
        }
    };

    match (difficulty, time_limit, memory_limit, test_cases) {
        (Some(difficulty), Some(time_limit), Some(memory_limit), Some(testcases))
            if errors.is_empty() =>
        {
            Ok(CreateTaskPayload {
                title: form.title.clone(),
                description: form.description.clone(),
                input_format: form.input_format.clone(),
                output_format: form.output_format.clone(),
                difficulty: difficulty.into(),
                time_limit,
                memory_limit,
                testcases,
                tags,
            })
        }
        _ => {
            debug!(fields = ?errors.fields().collect::<Vec<_>>(), "task form rejected");
            if malformed {
                Err(TaskValidationError::MalformedTestCases(errors))
            } else {
                Err(TaskValidationError::Invalid(errors))
            }
        }
    }
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, &'static str> {
    if raw.is_empty() {
        return Err("Difficulty is required");
    }
    raw.parse()
        .map_err(|_| "Difficulty must be one of Easy, Medium, Hard")
}

fn positive_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|value| *value > 0)
}

/// Splits on commas, trims, drops empty names.
pub fn parse_tags(raw: &str) -> Vec<Tag> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Tag::named)
        .collect()
}

/// An empty field counts as `[]`. Every offending element is checked, but
/// only the last message survives since the form shows one message per field.
fn parse_test_cases(raw: &str) -> Result<Vec<NewTestCase>, TestCaseError> {
    let source = if raw.is_empty() { "[]" } else { raw };
    let value: Value = serde_json::from_str(source).map_err(|_| TestCaseError::Malformed)?;

    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(TestCaseError::Invalid(
                "At least one test case is required".to_string(),
            ))
        }
    };

    let mut last_error = None;
    let mut test_cases = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match (
            truthy_text(item.get("input_data")),
            truthy_text(item.get("expected_output")),
        ) {
            (Some(input_data), Some(expected_output)) => test_cases.push(NewTestCase {
                input_data,
                expected_output,
            }),
            _ => {
                last_error = Some(format!(
                    "Test case {} must have both input_data and expected_output",
                    index + 1
                ));
            }
        }
    }

    match last_error {
        Some(message) => Err(TestCaseError::Invalid(message)),
        None => Ok(test_cases),
    }
}

/// Text of a present, non-empty value. Non-string scalars are kept as their
/// JSON text; `null`, `false`, `0` and `""` count as missing.
fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
