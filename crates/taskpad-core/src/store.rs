use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::storage::Storage;
use crate::task::Task;

/// Fixed storage key holding the JSON array of all tasks.
pub const TASKS_KEY: &str = "tasks";

/// Owner of the canonical task collection. The in-memory list is mutated
/// synchronously and is immediately visible to consumers; the durable write
/// after each mutation is fire-and-forget, so its failure is logged and
/// never surfaced to the caller.
pub struct TaskStore {
    storage: Box<dyn Storage>,
    tasks: Vec<Task>,
    loading: bool,
}

impl TaskStore {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            tasks: Vec::new(),
            loading: true,
        }
    }

    /// One-shot startup read. Corrupt or unreadable data is treated as an
    /// empty collection; the loading flag clears either way.
    #[tracing::instrument(skip(self))]
    pub fn load(&mut self) {
        match self.storage.get(TASKS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => {
                    info!(count = tasks.len(), "loaded tasks");
                    self.tasks = tasks;
                }
                Err(err) => {
                    warn!(error = %err, "persisted tasks were corrupt; starting empty");
                    self.tasks.clear();
                }
            },
            Ok(None) => {
                info!("no persisted tasks; starting empty");
            }
            Err(err) => {
                warn!(error = %err, "failed reading persisted tasks; starting empty");
            }
        }
        self.loading = false;
    }

    /// True until the startup load has completed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Appends a fully-formed task. Validation is the form's job; the store
    /// takes what it is given.
    #[tracing::instrument(skip(self, task), fields(id = %task.id))]
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
        debug!(count = self.tasks.len(), "task added");
        self.persist();
    }

    /// Replaces the entry with a matching id in place; order preserved.
    /// Unknown ids are a silent no-op and persist nothing.
    #[tracing::instrument(skip(self, task), fields(id = %task.id))]
    pub fn update(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(slot) => {
                *slot = task;
                debug!("task updated");
                self.persist();
            }
            None => {
                debug!("update for unknown task ignored");
            }
        }
    }

    /// Removes the entry with a matching id if present; no-op otherwise.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn delete(&mut self, id: Uuid) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);

        if self.tasks.len() < before {
            debug!(count = self.tasks.len(), "task deleted");
            self.persist();
        } else {
            debug!("delete for unknown task ignored");
        }
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.tasks) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed serializing tasks; write skipped");
                return;
            }
        };

        if let Err(err) = self.storage.set(TASKS_KEY, &payload) {
            warn!(error = %err, "failed persisting tasks");
        }
    }
}
