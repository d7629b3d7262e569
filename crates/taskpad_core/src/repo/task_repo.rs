//! Task collection persistence adapter.
//!
//! # Responsibility
//! - Serialize the full ordered task collection to the storage port.
//! - Keep key naming and blob format stable for existing stores.
//!
//! # Invariants
//! - `save_all` overwrites the whole collection; there is no partial patch.
//! - `load_all` never fails on malformed blobs; it recovers to empty.

use crate::db::DbError;
use crate::model::task::Task;
use crate::model::theme::Theme;
use crate::repo::kv::KvStore;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized task collection.
pub const TASKS_KEY: &str = "tasks";
/// Storage key holding the theme preference literal.
pub const THEME_KEY: &str = "theme";
/// Fixed name of the export artifact.
pub const EXPORT_FILE_NAME: &str = "todo-tasks.json";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error for collection reads and writes.
///
/// Deserialization failures never surface here; they recover to an empty
/// collection inside [`TaskRepository::load_all`].
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize task collection: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Persistence adapter over an injected key-value storage port.
pub struct TaskRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> TaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the stored collection in stored order.
    ///
    /// A missing key or a blob that fails to parse yields an empty
    /// collection. Parse failures are logged and otherwise swallowed so a
    /// corrupted store never blocks startup.
    pub fn load_all(&self) -> RepoResult<Vec<Task>> {
        let Some(raw) = self.store.get(TASKS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(tasks) => Ok(tasks),
            Err(err) => {
                warn!("event=tasks_load module=repo status=recovered error={err}");
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the stored collection wholesale with the given sequence.
    pub fn save_all(&self, tasks: &[Task]) -> RepoResult<()> {
        let blob = serde_json::to_string(tasks).map_err(RepoError::Serialize)?;
        self.store.set(TASKS_KEY, &blob)?;
        Ok(())
    }

    /// Appends one task after everything currently stored.
    pub fn append_one(&self, task: &Task) -> RepoResult<()> {
        let mut tasks = self.load_all()?;
        tasks.push(task.clone());
        self.save_all(&tasks)
    }

    /// Removes every stored task whose `(text, date)` pair matches.
    ///
    /// All structural matches go, not just one; callers relying on
    /// single-row removal must not create duplicate `(text, date)` pairs.
    pub fn remove_matching(&self, text: &str, date: &str) -> RepoResult<()> {
        let mut tasks = self.load_all()?;
        tasks.retain(|task| !task.matches(text, date));
        self.save_all(&tasks)
    }

    /// Reads the persisted theme preference, defaulting to light.
    pub fn load_theme(&self) -> RepoResult<Theme> {
        let value = self.store.get(THEME_KEY)?;
        Ok(value
            .as_deref()
            .map(Theme::from_store_value)
            .unwrap_or_default())
    }

    /// Persists the theme preference literal.
    pub fn save_theme(&self, theme: Theme) -> RepoResult<()> {
        self.store.set(THEME_KEY, theme.as_store_value())?;
        Ok(())
    }

    /// Pretty-printed snapshot of the stored collection, for export.
    ///
    /// Reads storage directly rather than any in-memory state, so the
    /// artifact always reflects the last persisted write.
    pub fn export_json(&self) -> RepoResult<String> {
        let tasks = self.load_all()?;
        serde_json::to_string_pretty(&tasks).map_err(RepoError::Serialize)
    }
}
