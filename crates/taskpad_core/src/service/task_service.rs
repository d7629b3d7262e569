//! Task list use-case service.
//!
//! # Responsibility
//! - Own the canonical ordered task collection and its row projection.
//! - Wire add/toggle/delete/theme/export handlers to persistence and
//!   reminders.
//!
//! # Invariants
//! - The persisted collection equals the canonical collection, in order,
//!   at the time of every write.
//! - The row projection is regenerated from canonical state and is never
//!   read back as a data source.

use crate::model::task::{Task, TaskValidationError};
use crate::model::theme::Theme;
use crate::reminder::{self, Notifier, ReminderHandle};
use crate::repo::kv::KvStore;
use crate::repo::task_repo::{RepoError, TaskRepository, EXPORT_FILE_NAME};
use crate::view::{self, TaskRow};
use chrono::Local;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Controller-level error taxonomy.
///
/// Validation failures abort with no state change; everything else is a
/// persistence transport error bubbling up unchanged.
#[derive(Debug)]
pub enum ServiceError {
    Validation(TaskValidationError),
    Repo(RepoError),
    /// A toggle or delete referenced a row index that does not exist.
    UnknownRow(usize),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::UnknownRow(index) => write!(f, "no task row at index {index}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::UnknownRow(_) => None,
        }
    }
}

impl From<TaskValidationError> for ServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Raw input captured from the add form.
#[derive(Debug, Clone, Default)]
pub struct AddTaskInput {
    pub text: String,
    pub date: String,
    pub priority: String,
    pub category: String,
}

/// The export artifact: fixed file name plus pretty-printed JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub json: String,
}

/// Use-case service owning canonical task state.
///
/// Drivers dispatch one user action per handler call; handlers run to
/// completion, so no locking is needed around the canonical collection.
pub struct TaskService<S: KvStore> {
    repo: TaskRepository<S>,
    notifier: Arc<dyn Notifier>,
    tasks: Vec<Task>,
    rows: Vec<TaskRow>,
    theme: Theme,
    pending_reminders: Vec<((String, String), ReminderHandle)>,
}

impl<S: KvStore> TaskService<S> {
    /// Creates the service and runs the startup load.
    ///
    /// Reads the stored collection and theme, and renders one row per
    /// task in stored order. A corrupt collection blob loads as empty.
    pub fn open(store: S, notifier: Arc<dyn Notifier>) -> ServiceResult<Self> {
        let repo = TaskRepository::new(store);
        let tasks = repo.load_all()?;
        let rows = view::render_rows(&tasks);
        let theme = repo.load_theme()?;
        info!(
            "event=service_open module=service status=ok tasks={} theme={}",
            tasks.len(),
            theme.as_store_value()
        );
        Ok(Self {
            repo,
            notifier,
            tasks,
            rows,
            theme,
            pending_reminders: Vec::new(),
        })
    }

    /// Current row projection, in display order.
    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// Canonical tasks, in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Active theme preference.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Number of reminders armed and not yet fired or cancelled.
    pub fn pending_reminders(&self) -> usize {
        self.pending_reminders.len()
    }

    /// Handles the add action: validate, persist, render, maybe remind.
    ///
    /// Returns the new row's index. Validation failure leaves every piece
    /// of state untouched; the driver surfaces the alert.
    pub fn add_task(&mut self, input: AddTaskInput) -> ServiceResult<usize> {
        let task = Task::new(input.text, input.date, input.priority, input.category)?;
        self.repo.append_one(&task)?;
        if let Some(handle) =
            reminder::schedule(&task, Local::now(), Arc::clone(&self.notifier))
        {
            self.pending_reminders
                .push(((task.text.clone(), task.date.clone()), handle));
        }
        self.rows.push(view::render_row(&task));
        self.tasks.push(task);
        info!(
            "event=task_add module=service status=ok tasks={}",
            self.tasks.len()
        );
        Ok(self.tasks.len() - 1)
    }

    /// Toggles the completion flag of the row at `index`.
    ///
    /// Persists the whole collection afterwards; returns the new flag.
    pub fn toggle_completed(&mut self, index: usize) -> ServiceResult<bool> {
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(ServiceError::UnknownRow(index))?;
        task.toggle_completed();
        let completed = task.completed;
        self.rows[index] = view::render_row(task);
        self.repo.save_all(&self.tasks)?;
        info!("event=task_toggle module=service status=ok completed={completed}");
        Ok(completed)
    }

    /// Deletes the row at `index`.
    ///
    /// Removal is by structural `(text, date)` match, so every duplicate
    /// of the clicked row goes too, from both canonical state and
    /// storage. Pending reminders for the pair are cancelled.
    pub fn delete_task(&mut self, index: usize) -> ServiceResult<()> {
        let target = self
            .tasks
            .get(index)
            .cloned()
            .ok_or(ServiceError::UnknownRow(index))?;
        self.repo.remove_matching(&target.text, &target.date)?;
        self.tasks
            .retain(|task| !task.matches(&target.text, &target.date));
        self.rows = view::render_rows(&self.tasks);

        let mut kept = Vec::new();
        for ((text, date), handle) in self.pending_reminders.drain(..) {
            if text == target.text && date == target.date {
                handle.cancel();
            } else {
                kept.push(((text, date), handle));
            }
        }
        self.pending_reminders = kept;

        info!(
            "event=task_delete module=service status=ok tasks={}",
            self.tasks.len()
        );
        Ok(())
    }

    /// Flips the theme preference and persists it.
    pub fn toggle_theme(&mut self) -> ServiceResult<Theme> {
        self.theme = self.theme.toggled();
        self.repo.save_theme(self.theme)?;
        info!(
            "event=theme_toggle module=service status=ok theme={}",
            self.theme.as_store_value()
        );
        Ok(self.theme)
    }

    /// Builds the export artifact from the stored collection.
    pub fn export(&self) -> ServiceResult<ExportArtifact> {
        Ok(ExportArtifact {
            file_name: EXPORT_FILE_NAME,
            json: self.repo.export_json()?,
        })
    }

    /// Re-reads storage and rebuilds canonical state and rows.
    ///
    /// The startup path of [`TaskService::open`]; also usable after an
    /// external writer replaced the store (last writer wins).
    pub fn reload(&mut self) -> ServiceResult<()> {
        self.tasks = self.repo.load_all()?;
        self.rows = view::render_rows(&self.tasks);
        self.theme = self.repo.load_theme()?;
        Ok(())
    }
}
