use tracing::debug;
use uuid::Uuid;

use crate::store::TaskStore;
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    DueDate,
}

impl SortOrder {
    /// The order the list screen's sort control advances through.
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            Self::Newest => Self::Oldest,
            Self::Oldest => Self::DueDate,
            Self::DueDate => Self::Newest,
        }
    }
}

/// The display pipeline: search filter, then status filter, then a stable
/// sort. Pure; ties keep collection order, and the collection itself is
/// never touched.
#[must_use]
pub fn derive_view<'a>(
    tasks: &'a [Task],
    search: &str,
    status: StatusFilter,
    sort: SortOrder,
) -> Vec<&'a Task> {
    let needle = search.to_lowercase();

    let mut rows: Vec<&Task> = tasks
        .iter()
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .filter(|task| match status {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
        })
        .collect();

    match sort {
        SortOrder::Newest => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::DueDate => rows.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
    }

    rows
}

/// Flips a task's completion flag through the store. Completion is a store
/// mutation, never a view-local flag.
pub fn toggle_completed(store: &mut TaskStore, id: Uuid) {
    let Some(task) = store.get(id) else {
        debug!(%id, "toggle for unknown task ignored");
        return;
    };

    let mut updated = task.clone();
    updated.completed = !updated.completed;
    store.update(updated);
}

/// Ephemeral state of the list screen: search text, status filter, sort
/// order, and the armed delete confirmation. None of it touches the stored
/// data.
#[derive(Debug, Clone, Default)]
pub struct ListScreen {
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortOrder,
    pending_delete: Option<Uuid>,
}

impl ListScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
    }

    pub fn cycle_sort(&mut self) -> SortOrder {
        self.sort = self.sort.cycled();
        self.sort
    }

    /// The derived sequence for display, recomputed on every call.
    #[must_use]
    pub fn visible<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        derive_view(tasks, &self.search, self.status, self.sort)
    }

    /// Arms the delete confirmation for a task (the confirmation modal).
    pub fn request_delete(&mut self, id: Uuid) {
        self.pending_delete = Some(id);
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<Uuid> {
        self.pending_delete
    }

    /// Dismisses the confirmation without deleting.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the armed task, if any, and disarms the confirmation.
    pub fn confirm_delete(&mut self, store: &mut TaskStore) {
        if let Some(id) = self.pending_delete.take() {
            store.delete(id);
        }
    }
}
