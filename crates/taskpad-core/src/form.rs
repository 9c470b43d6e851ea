use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::datetime::to_local_date;
use crate::id::IdSource;
use crate::nav::Navigator;
use crate::notify::{Notifier, Toast};
use crate::store::TaskStore;
use crate::task::Task;

pub const TITLE_REQUIRED: &str = "Title is required.";
pub const DESCRIPTION_REQUIRED: &str = "Description is required.";
pub const DUE_DATE_REQUIRED: &str = "Due date is required.";
pub const DUE_DATE_IN_PAST: &str = "Due date cannot be in the past.";

/// Per-field validation errors, surfaced inline. Never raised as `Err`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
    pub due_date: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none()
    }
}

/// Runs every check independently so multiple errors surface at once. A due
/// date of `today` is valid; only strictly earlier dates are rejected.
#[must_use]
pub fn validate(
    title: &str,
    description: &str,
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if title.trim().is_empty() {
        errors.title = Some(TITLE_REQUIRED);
    }
    if description.trim().is_empty() {
        errors.description = Some(DESCRIPTION_REQUIRED);
    }
    match due_date {
        None => errors.due_date = Some(DUE_DATE_REQUIRED),
        Some(due) if due < today => errors.due_date = Some(DUE_DATE_IN_PAST),
        Some(_) => {}
    }

    errors
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    ShowingErrors,
    Submitted,
}

#[derive(Debug, Clone)]
enum FormMode {
    Create,
    Edit { original: Task },
}

/// The task form's screen state: field values, inline errors, and the
/// Idle / ShowingErrors / Submitted machine. Editing any field clears all
/// errors and returns the form to Idle.
#[derive(Debug, Clone)]
pub struct TaskForm {
    mode: FormMode,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    errors: FieldErrors,
    phase: FormPhase,
}

impl TaskForm {
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            due_date: None,
            errors: FieldErrors::default(),
            phase: FormPhase::Idle,
        }
    }

    /// Opens the form for `task_id`. A known id prefills the fields for
    /// editing; an absent or unknown id falls back to create mode.
    #[must_use]
    pub fn open(store: &TaskStore, task_id: Option<Uuid>) -> Self {
        let Some(original) = task_id.and_then(|id| store.get(id)).cloned() else {
            if let Some(id) = task_id {
                debug!(%id, "no task to edit; opening in create mode");
            }
            return Self::create();
        };

        Self {
            title: original.title.clone(),
            description: original.description.clone(),
            due_date: Some(original.due_date),
            mode: FormMode::Edit { original },
            errors: FieldErrors::default(),
            phase: FormPhase::Idle,
        }
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title = text.into();
        self.clear_errors();
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
        self.clear_errors();
    }

    pub fn set_due_date(&mut self, date: NaiveDate) {
        self.due_date = Some(date);
        self.clear_errors();
    }

    fn clear_errors(&mut self) {
        self.errors = FieldErrors::default();
        self.phase = FormPhase::Idle;
    }

    /// Validates and, if clean, mutates the store, fires the success toast,
    /// and pops navigation back to the list. Returns whether submission went
    /// through; on failure the per-field errors are held for display.
    #[tracing::instrument(skip_all, fields(editing = self.is_editing()))]
    pub fn submit(
        &mut self,
        store: &mut TaskStore,
        ids: &dyn IdSource,
        notifier: &dyn Notifier,
        nav: &mut Navigator,
        now: DateTime<Utc>,
    ) -> bool {
        let errors = validate(
            &self.title,
            &self.description,
            self.due_date,
            to_local_date(now),
        );
        if !errors.is_empty() {
            debug!(?errors, "validation failed");
            self.errors = errors;
            self.phase = FormPhase::ShowingErrors;
            return false;
        }

        let Some(due_date) = self.due_date else {
            // validate() guarantees a date is present on the clean path.
            return false;
        };

        match &self.mode {
            FormMode::Edit { original } => {
                let mut task = original.clone();
                task.title = self.title.clone();
                task.description = self.description.clone();
                task.due_date = due_date;
                let id = task.id;
                store.update(task);
                info!(%id, "task updated");
                notifier.notify(Toast::success(
                    "Task Updated",
                    "Your task has been updated successfully!",
                ));
            }
            FormMode::Create => {
                let task = Task::new(
                    ids.next_id(),
                    self.title.clone(),
                    self.description.clone(),
                    due_date,
                    now,
                );
                let id = task.id;
                store.add(task);
                info!(%id, "task created");
                notifier.notify(Toast::success(
                    "Task Created",
                    "Your task has been created successfully!",
                ));
            }
        }

        nav.go_back();
        self.phase = FormPhase::Submitted;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use super::{
        DESCRIPTION_REQUIRED, DUE_DATE_IN_PAST, DUE_DATE_REQUIRED, FormPhase, TITLE_REQUIRED,
        TaskForm, validate,
    };
    use crate::datetime::to_local_date;
    use crate::id::IdSource;
    use crate::nav::{Navigator, Screen};
    use crate::notify::{Notifier, Toast};
    use crate::storage::MemoryStorage;
    use crate::store::TaskStore;
    use crate::task::Task;

    struct FixedIds(Uuid);

    impl IdSource for FixedIds {
        fn next_id(&self) -> Uuid {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        toasts: Mutex<Vec<Toast>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, toast: Toast) {
            if let Ok(mut toasts) = self.toasts.lock() {
                toasts.push(toast);
            }
        }
    }

    fn fixed_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0)
            .single()
            .expect("valid now")
    }

    fn empty_store() -> TaskStore {
        let mut store = TaskStore::new(Box::new(MemoryStorage::new()));
        store.load();
        store
    }

    #[test]
    fn all_checks_run_independently() {
        let today = NaiveDate::from_ymd_opt(2024, 10, 1).expect("valid today");

        let errors = validate("", "   ", None, today);
        assert_eq!(errors.title, Some(TITLE_REQUIRED));
        assert_eq!(errors.description, Some(DESCRIPTION_REQUIRED));
        assert_eq!(errors.due_date, Some(DUE_DATE_REQUIRED));

        let yesterday = today.pred_opt().expect("valid yesterday");
        let errors = validate("t", "d", Some(yesterday), today);
        assert_eq!(errors.due_date, Some(DUE_DATE_IN_PAST));

        let errors = validate("t", "d", Some(today), today);
        assert!(errors.is_empty());
    }

    #[test]
    fn empty_submit_shows_three_errors_and_leaves_the_store_alone() {
        let mut store = empty_store();
        let mut nav = Navigator::new();
        nav.navigate(Screen::TaskForm { task_id: None });
        let notifier = RecordingNotifier::default();

        let mut form = TaskForm::create();
        let submitted = form.submit(
            &mut store,
            &FixedIds(Uuid::nil()),
            &notifier,
            &mut nav,
            fixed_now(),
        );

        assert!(!submitted);
        assert_eq!(form.phase(), FormPhase::ShowingErrors);
        assert_eq!(form.errors().title, Some(TITLE_REQUIRED));
        assert_eq!(form.errors().description, Some(DESCRIPTION_REQUIRED));
        assert_eq!(form.errors().due_date, Some(DUE_DATE_REQUIRED));
        assert!(store.tasks().is_empty());
        assert!(notifier.toasts.lock().expect("toasts").is_empty());
        assert_eq!(nav.current(), Screen::TaskForm { task_id: None });
    }

    #[test]
    fn editing_a_field_clears_errors_and_returns_to_idle() {
        let mut store = empty_store();
        let mut nav = Navigator::new();
        let notifier = RecordingNotifier::default();

        let mut form = TaskForm::create();
        form.submit(
            &mut store,
            &FixedIds(Uuid::nil()),
            &notifier,
            &mut nav,
            fixed_now(),
        );
        assert_eq!(form.phase(), FormPhase::ShowingErrors);

        form.set_title("New Task");
        assert_eq!(form.phase(), FormPhase::Idle);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn clean_create_adds_a_task_and_navigates_back() {
        let mut store = empty_store();
        let mut nav = Navigator::new();
        nav.navigate(Screen::TaskForm { task_id: None });
        let notifier = RecordingNotifier::default();
        let id = Uuid::new_v4();

        let now = fixed_now();
        let tomorrow = to_local_date(now) + Duration::days(1);

        let mut form = TaskForm::create();
        form.set_title("New Task");
        form.set_description("Task Description");
        form.set_due_date(tomorrow);

        let submitted = form.submit(&mut store, &FixedIds(id), &notifier, &mut nav, now);

        assert!(submitted);
        assert_eq!(form.phase(), FormPhase::Submitted);
        assert_eq!(nav.current(), Screen::TaskList);

        let created = store.get(id).expect("task stored");
        assert_eq!(created.title, "New Task");
        assert_eq!(created.description, "Task Description");
        assert_eq!(created.due_date, tomorrow);
        assert!(!created.completed);
        assert_eq!(created.created_at, now);

        let toasts = notifier.toasts.lock().expect("toasts");
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Task Created");
    }

    #[test]
    fn editing_only_the_title_keeps_id_and_due_date() {
        let mut store = empty_store();
        let mut nav = Navigator::new();
        let notifier = RecordingNotifier::default();

        let now = fixed_now();
        let due = to_local_date(now) + Duration::days(11);
        let existing = Task::new(
            Uuid::new_v4(),
            "Existing Task".to_string(),
            "Task Description".to_string(),
            due,
            now - Duration::days(3),
        );
        store.add(existing.clone());

        let mut form = TaskForm::open(&store, Some(existing.id));
        assert!(form.is_editing());
        assert_eq!(form.title, "Existing Task");

        nav.navigate(Screen::TaskForm {
            task_id: Some(existing.id),
        });
        form.set_title("Updated Task");
        let submitted = form.submit(
            &mut store,
            &FixedIds(Uuid::nil()),
            &notifier,
            &mut nav,
            now,
        );

        assert!(submitted);
        assert_eq!(nav.current(), Screen::TaskList);
        assert_eq!(store.tasks().len(), 1);

        let updated = store.get(existing.id).expect("task still stored");
        assert_eq!(updated.title, "Updated Task");
        assert_eq!(updated.description, existing.description);
        assert_eq!(updated.due_date, existing.due_date);
        assert_eq!(updated.created_at, existing.created_at);

        let toasts = notifier.toasts.lock().expect("toasts");
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title, "Task Updated");
    }

    #[test]
    fn unknown_edit_id_opens_in_create_mode() {
        let store = empty_store();
        let form = TaskForm::open(&store, Some(Uuid::new_v4()));
        assert!(!form.is_editing());
        assert!(form.title.is_empty());
        assert!(form.due_date.is_none());
    }

    #[test]
    fn past_due_date_blocks_submission() {
        let mut store = empty_store();
        let mut nav = Navigator::new();
        let notifier = RecordingNotifier::default();

        let now = fixed_now();
        let yesterday = to_local_date(now) - Duration::days(1);

        let mut form = TaskForm::create();
        form.set_title("New Task");
        form.set_description("Task Description");
        form.set_due_date(yesterday);

        let submitted = form.submit(
            &mut store,
            &FixedIds(Uuid::nil()),
            &notifier,
            &mut nav,
            now,
        );

        assert!(!submitted);
        assert_eq!(form.errors().due_date, Some(DUE_DATE_IN_PAST));
        assert!(store.tasks().is_empty());
    }
}
