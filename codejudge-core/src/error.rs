use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Unsupported page size: {0} (expected one of 10, 20, 50, 100)")]
    UnsupportedPageSize(u32),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
