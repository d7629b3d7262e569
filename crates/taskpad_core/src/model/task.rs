//! Task domain model.
//!
//! # Responsibility
//! - Define the record shape shared by persistence, view and service layers.
//! - Enforce the creation-time text validation rule.
//!
//! # Invariants
//! - `text` is non-empty in every constructed task.
//! - `completed` is always a concrete boolean in the serialized form.
//! - Two tasks with equal `(text, date)` are structurally indistinguishable.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure raised while constructing a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task text was empty after trimming.
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// A single to-do entry.
///
/// Optional fields are empty strings rather than `Option` so the serde
/// shape matches the stored collection format exactly:
/// `{"text","date","priority","category","completed"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// User-supplied description, trimmed, never empty at creation.
    pub text: String,
    /// Due date in `YYYY-MM-DD` form, or empty when unset. Not validated.
    #[serde(default)]
    pub date: String,
    /// Free-form priority label (`low`/`medium`/`high` in the stock UI).
    #[serde(default)]
    pub priority: String,
    /// Free-form category label.
    #[serde(default)]
    pub category: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Builds a task from raw user input.
    ///
    /// `text` is trimmed and rejected when empty; the remaining fields are
    /// accepted verbatim, malformed or not. Stored values are only
    /// validated here, never re-checked on read.
    pub fn new(
        text: impl Into<String>,
        date: impl Into<String>,
        priority: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(Self {
            text,
            date: date.into(),
            priority: priority.into(),
            category: category.into(),
            completed: false,
        })
    }

    /// Whether this task structurally matches a delete target.
    ///
    /// Identity is the `(text, date)` pair; priority, category and the
    /// completion flag do not participate.
    pub fn matches(&self, text: &str, date: &str) -> bool {
        self.text == text && self.date == date
    }

    /// Flips the completion flag.
    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }
}
