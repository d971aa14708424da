use serde::{Deserialize, Serialize};
use std::fmt;

/// A single to-do entry. The label is the whole task; it has no identity
/// beyond its position in a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task {
    pub text: String,
}

impl Task {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Task {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Task {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Pending,
    Completed,
}

impl ListKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Both lists, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
}

impl TaskState {
    pub fn new(pending: Vec<Task>, completed: Vec<Task>) -> Self {
        Self { pending, completed }
    }

    pub fn list(&self, kind: ListKind) -> &[Task] {
        match kind {
            ListKind::Pending => &self.pending,
            ListKind::Completed => &self.completed,
        }
    }
}
