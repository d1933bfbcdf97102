use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Languages accepted by the judge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Java,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Python, Language::Java];

    /// Value of the `language` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::Java => "java",
        }
    }

    /// Name of the uploaded source file, `solution.<ext>`.
    pub fn file_name(&self) -> String {
        format!("solution.{}", self.extension())
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.extension().eq_ignore_ascii_case(extension))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            other => Err(CoreError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Outcome of grading a submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Received by the server, result not known yet.
    Pending,
}

impl Verdict {
    /// `"wrong"` and `"correct"` are the only recognized statuses.
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some("wrong") => Verdict::Incorrect,
            Some("correct") => Verdict::Correct,
            _ => Verdict::Pending,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Correct => "Correct answer",
            Verdict::Incorrect => "Wrong answer",
            Verdict::Pending => "Submission accepted, verdict pending",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Body returned by `submissions`. Any other keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl SubmissionResponse {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_status(self.status.as_deref())
    }
}
