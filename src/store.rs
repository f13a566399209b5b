// Task store: in-memory collection mirrored to a single persisted slot

use crate::backend::Backend;
use crate::category::Categories;
use crate::codec;
use crate::error::TaskError;
use crate::filter::Filter;
use crate::models::{Task, TaskId};
use chrono::NaiveDate;
use eyre::{Report, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Ordered task collection, flushed in full to `B` after every mutation
pub struct TaskStore<B: Backend> {
    backend: B,
    tasks: Vec<Task>,
    categories: Categories,
    persist_error: Option<Report>,
}

impl<B: Backend> TaskStore<B> {
    /// Open a store over `backend` and load whatever the slot holds
    pub fn open(backend: B) -> Self {
        Self::with_categories(backend, Categories::default())
    }

    /// Open with an explicit category policy
    pub fn with_categories(backend: B, categories: Categories) -> Self {
        let mut store = Self {
            backend,
            tasks: Vec::new(),
            categories,
            persist_error: None,
        };
        store.load_all();
        store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    // ========================================================================
    // Read API
    // ========================================================================

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks matching every filter, in insertion order
    pub fn list(&self, filters: &[Filter]) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| filters.iter().all(|f| f.matches(task)))
            .collect()
    }

    /// Resolve a case-insensitive prefix of an id's hyphenated form.
    ///
    /// Returns `None` when nothing matches or the prefix is ambiguous.
    pub fn resolve_id(&self, prefix: &str) -> Option<Uuid> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return None;
        }

        let mut matches = self
            .tasks
            .iter()
            .filter(|t| t.id.hyphenated().to_string().starts_with(&prefix));

        let first = matches.next()?;
        if matches.next().is_some() {
            debug!(prefix = %prefix, "Ambiguous id prefix");
            return None;
        }
        Some(first.id)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a task and append it to the collection.
    ///
    /// The title is trimmed; an empty result is rejected. Under a closed
    /// category policy, unknown categories are rejected too. Nothing changes
    /// on rejection.
    pub fn add(
        &mut self,
        title: &str,
        is_important: bool,
        due_date: NaiveDate,
        category: &str,
    ) -> Result<Task, TaskError> {
        let title = normalize_title(title)?;
        if !self.categories.accepts(category) {
            return Err(TaskError::UnknownCategory {
                category: category.to_string(),
            });
        }

        let task = Task::new(title, is_important, due_date, category);
        debug!(id = %task.id, "Adding task");
        self.tasks.push(task.clone());
        self.persist();

        Ok(task)
    }

    /// Flip `is_done`. `None` if no task has this id.
    pub fn toggle_done(&mut self, id: TaskId) -> Option<&Task> {
        let index = self.position(id)?;
        self.tasks[index].is_done = !self.tasks[index].is_done;
        self.persist();

        self.tasks.get(index)
    }

    /// Remove the task with this id, keeping the others in order
    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let index = self.position(id)?;
        let removed = self.tasks.remove(index);
        self.persist();

        Some(removed)
    }

    /// Replace a title using the same rules as `add`.
    ///
    /// The title is checked before the lookup, so an invalid title is reported
    /// even for an unknown id.
    pub fn edit_title(&mut self, id: TaskId, new_title: &str) -> Result<Option<&Task>, TaskError> {
        let title = normalize_title(new_title)?;
        Ok(self.edit_title_raw(id, title))
    }

    /// Replace a title verbatim: no trimming, empty titles allowed
    pub fn edit_title_raw(&mut self, id: TaskId, new_title: &str) -> Option<&Task> {
        let index = self.position(id)?;
        self.tasks[index].title = new_title.to_string();
        self.persist();

        self.tasks.get(index)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Replace the in-memory collection with the contents of the slot.
    ///
    /// An absent, empty, unreadable, or undecodable slot leaves the
    /// collection empty. Failures are logged, never returned.
    pub fn load_all(&mut self) -> &[Task] {
        self.tasks = match self.backend.load() {
            Ok(Some(bytes)) => match codec::decode(&bytes) {
                Ok(tasks) => {
                    let duplicates = duplicate_ids(&tasks);
                    if !duplicates.is_empty() {
                        warn!(duplicates = ?duplicates, "Task slot holds duplicate ids, lookups hit the first copy");
                    }
                    tasks
                }
                Err(e) => {
                    warn!(error = ?e, bytes = bytes.len(), "Failed to decode task slot, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("Task slot is empty");
                Vec::new()
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read task slot, starting empty");
                Vec::new()
            }
        };

        info!(count = self.tasks.len(), "Loaded tasks");
        &self.tasks
    }

    /// Write the full collection to the slot, reporting failures
    pub fn flush(&mut self) -> Result<()> {
        let bytes = codec::encode(&self.tasks)?;
        self.backend.save(&bytes)
    }

    /// Flush after a mutation. Failures are logged and the in-memory
    /// collection stays authoritative.
    fn persist(&mut self) {
        self.persist_error = match self.flush() {
            Ok(()) => None,
            Err(e) => {
                warn!(error = ?e, count = self.tasks.len(), "Failed to persist tasks, keeping in-memory state");
                Some(e)
            }
        };
    }

    /// Failure of the most recent automatic flush, if it failed.
    ///
    /// Cleared by a later successful flush and by taking it.
    pub fn take_persist_error(&mut self) -> Option<Report> {
        self.persist_error.take()
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        let index = self.tasks.iter().position(|t| t.id == id);
        if index.is_none() {
            debug!(id = %id, "Task not found");
        }
        index
    }
}

fn duplicate_ids(tasks: &[Task]) -> Vec<TaskId> {
    let mut seen = HashSet::new();
    tasks.iter().map(|t| t.id).filter(|id| !seen.insert(*id)).collect()
}

fn normalize_title(title: &str) -> Result<&str, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(trimmed)
}
