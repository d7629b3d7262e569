//! Core domain logic for Taskpad.
//! This crate is the single source of truth for task list invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging};
pub use model::task::{Task, TaskValidationError};
pub use model::theme::Theme;
pub use reminder::{
    reminder_delay, schedule, Notifier, Permission, ReminderHandle, NOTIFICATION_ICON,
    NOTIFICATION_TITLE,
};
pub use repo::kv::{KvStore, MemoryKvStore, SqliteKvStore};
pub use repo::task_repo::{
    RepoError, RepoResult, TaskRepository, EXPORT_FILE_NAME, TASKS_KEY, THEME_KEY,
};
pub use service::task_service::{
    AddTaskInput, ExportArtifact, ServiceError, ServiceResult, TaskService,
};
pub use view::{derive_collection, render_row, render_rows, TaskRow};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
