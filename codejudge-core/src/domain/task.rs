use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::ids::TaskId;
use crate::error::CoreError;

/// Difficulty levels offered by the authoring form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| CoreError::UnknownDifficulty(s.to_string()))
    }
}

/// Difficulty as carried on the wire: `{"name": "Easy"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DifficultyRef {
    pub name: String,
}

impl DifficultyRef {
    /// The enumerated difficulty, if the server sent a known name.
    pub fn level(&self) -> Option<Difficulty> {
        self.name.parse().ok()
    }
}

impl From<Difficulty> for DifficultyRef {
    fn from(difficulty: Difficulty) -> Self {
        Self {
            name: difficulty.as_str().to_string(),
        }
    }
}

/// A named tag. The server assigns `id`; new tags are sent by name only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

impl Tag {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A test case as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(alias = "inputData")]
    pub input_data: String,
    #[serde(alias = "expectedOutput")]
    pub expected_output: String,
    #[serde(default, alias = "isPublic")]
    pub is_public: bool,
}

impl TestCase {
    pub fn new(input_data: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            id: None,
            input_data: input_data.into(),
            expected_output: expected_output.into(),
            is_public: false,
        }
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }
}

/// A test case in the creation payload. Only the two data fields are sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTestCase {
    pub input_data: String,
    pub expected_output: String,
}

/// A task as returned by `tasks/` (catalog rows) and `tasks/{id}/` (full view).
///
/// Catalog rows usually omit test cases, so every collection defaults to empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_format: String,
    #[serde(default)]
    pub output_format: String,
    #[serde(default)]
    pub difficulty: Option<DifficultyRef>,
    /// Seconds.
    #[serde(default)]
    pub time_limit: i64,
    /// Megabytes.
    #[serde(default)]
    pub memory_limit: i64,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub testcases: Vec<TestCase>,
}

impl Task {
    /// Difficulty name for display, `N/A` when the server sent none.
    pub fn difficulty_label(&self) -> &str {
        self.difficulty
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or("N/A")
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }

    pub fn public_test_cases(&self) -> impl Iterator<Item = &TestCase> {
        self.testcases.iter().filter(|tc| tc.is_public)
    }
}
