//! Row projection and derive-back for the task list view.
//!
//! # Responsibility
//! - Project tasks into display rows carrying the fixed metadata line.
//! - Recover a task collection from rows by parsing that line back.
//!
//! # Invariants
//! - Metadata markers appear in fixed order: date, priority, category.
//! - Derive-back never invents data: an unmatched marker derives as empty.

use crate::model::task::Task;
use once_cell::sync::Lazy;
use regex::Regex;

/// Marker glyphs and separator of the metadata line.
const DATE_MARKER: &str = "\u{1F4C5}"; // 📅
const PRIORITY_MARKER: &str = "\u{2B50}"; // ⭐
const CATEGORY_MARKER: &str = "\u{1F3F7}\u{FE0F}"; // 🏷️
const META_SEPARATOR: &str = " | ";

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\u{1F4C5} (\d{4}-\d{2}-\d{2})").expect("date pattern compiles"));
static PRIORITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\u{2B50} (\w+)").expect("priority pattern compiles"));
static CATEGORY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\u{1F3F7}\u{FE0F} (\w+)").expect("category pattern compiles"));

/// One rendered task row.
///
/// `meta` mirrors the metadata line exactly as displayed; `completed`
/// doubles as the row's visual completed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    /// The clickable text label; carries the task text verbatim.
    pub label: String,
    /// Metadata line, present only when at least one field is set.
    pub meta: Option<String>,
    /// Visual completed state.
    pub completed: bool,
}

/// Projects a task into its display row.
///
/// The metadata line joins a date marker, a priority marker and a
/// category marker (each present only when its field is non-empty) with
/// `" | "`, and is omitted entirely when all three are empty.
pub fn render_row(task: &Task) -> TaskRow {
    let parts: Vec<String> = [
        (DATE_MARKER, task.date.as_str()),
        (PRIORITY_MARKER, task.priority.as_str()),
        (CATEGORY_MARKER, task.category.as_str()),
    ]
    .iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(marker, value)| format!("{marker} {value}"))
    .collect();

    TaskRow {
        label: task.text.clone(),
        meta: if parts.is_empty() {
            None
        } else {
            Some(parts.join(META_SEPARATOR))
        },
        completed: task.completed,
    }
}

/// Projects a whole collection, preserving order.
pub fn render_rows(tasks: &[Task]) -> Vec<TaskRow> {
    tasks.iter().map(render_row).collect()
}

/// Rebuilds the task collection by scanning rows in display order.
///
/// Lossy by construction: field values are recovered only as far as the
/// marker patterns reach. A multi-word priority or category truncates at
/// the first word boundary, and a date not in `YYYY-MM-DD` form derives
/// as empty. This round-trip behavior is deliberate and pinned by tests;
/// persistence no longer depends on it.
pub fn derive_collection(rows: &[TaskRow]) -> Vec<Task> {
    rows.iter().map(derive_task).collect()
}

fn derive_task(row: &TaskRow) -> Task {
    let meta = row.meta.as_deref().unwrap_or("");
    Task {
        text: row.label.clone(),
        date: capture(&DATE_PATTERN, meta),
        priority: capture(&PRIORITY_PATTERN, meta),
        category: capture(&CATEGORY_PATTERN, meta),
        completed: row.completed,
    }
}

fn capture(pattern: &Regex, meta: &str) -> String {
    pattern
        .captures(meta)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str().to_string())
        .unwrap_or_default()
}
