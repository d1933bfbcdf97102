use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<TaskId> for i64 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_conversions() {
        let id = TaskId::new(42);
        assert_eq!(id.get(), 42);

        let raw: i64 = id.into();
        assert_eq!(raw, 42);
        assert_eq!(TaskId::from(42), id);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_task_id_parse() {
        assert_eq!(" 7 ".parse::<TaskId>().unwrap(), TaskId(7));
        assert!("seven".parse::<TaskId>().is_err());
    }

    #[test]
    fn test_task_id_is_transparent_on_the_wire() {
        assert_eq!(serde_json::to_string(&TaskId(3)).unwrap(), "3");
    }
}
