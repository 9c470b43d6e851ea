use std::path::Path;

use anyhow::{Context, anyhow};
use chrono::Utc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::{self, Config};
use crate::form::TaskForm;
use crate::id::{IdSource, UuidSource};
use crate::nav::{Navigator, Screen};
use crate::notify::{LogNotifier, Notifier, NullNotifier};
use crate::storage::FileStorage;
use crate::store::TaskStore;

/// The wired-up application: the store plus the navigation, notification,
/// and id collaborators. UI layers hold one of these and feed it events.
pub struct App {
    pub store: TaskStore,
    pub navigator: Navigator,
    notifier: Box<dyn Notifier>,
    ids: Box<dyn IdSource>,
}

impl App {
    /// Startup: load configuration, resolve and open the data directory,
    /// and perform the one-shot store load.
    #[tracing::instrument(skip(rc_override, data_override))]
    pub fn open(rc_override: Option<&Path>, data_override: Option<&Path>) -> anyhow::Result<Self> {
        let cfg = Config::load(rc_override)?;

        let data_dir = config::resolve_data_dir(&cfg, data_override)
            .context("failed to resolve data directory")?;
        let storage = FileStorage::open(&data_dir)
            .with_context(|| format!("failed to open storage at {}", data_dir.display()))?;

        let mut store = TaskStore::new(Box::new(storage));
        store.load();

        let notifier: Box<dyn Notifier> = if cfg.get_bool("notifications").unwrap_or(true) {
            Box::new(LogNotifier)
        } else {
            Box::new(NullNotifier)
        };

        info!(tasks = store.tasks().len(), "app ready");
        Ok(Self {
            store,
            navigator: Navigator::new(),
            notifier,
            ids: Box::new(UuidSource),
        })
    }

    /// Assembles an app from explicit collaborators; the injectable seam
    /// for embedders and tests.
    #[must_use]
    pub fn with_parts(
        store: TaskStore,
        notifier: Box<dyn Notifier>,
        ids: Box<dyn IdSource>,
    ) -> Self {
        Self {
            store,
            navigator: Navigator::new(),
            notifier,
            ids,
        }
    }

    /// Navigates to the form screen and opens it for `task_id` (edit mode
    /// for a known id, create mode otherwise).
    pub fn open_task_form(&mut self, task_id: Option<Uuid>) -> TaskForm {
        self.navigator.navigate(Screen::TaskForm { task_id });
        TaskForm::open(&self.store, task_id)
    }

    /// Submits the form against the store; on success the form itself pops
    /// navigation back to the list and fires the toast.
    pub fn submit_form(&mut self, form: &mut TaskForm) -> bool {
        form.submit(
            &mut self.store,
            self.ids.as_ref(),
            self.notifier.as_ref(),
            &mut self.navigator,
            Utc::now(),
        )
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::App;
    use crate::datetime::to_local_date;
    use crate::id::IdSource;
    use crate::nav::Screen;
    use crate::notify::NullNotifier;
    use crate::storage::MemoryStorage;
    use crate::store::TaskStore;

    struct FixedIds(Uuid);

    impl IdSource for FixedIds {
        fn next_id(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn assembled_app_routes_form_submissions_into_the_store() {
        let mut store = TaskStore::new(Box::new(MemoryStorage::new()));
        store.load();

        let id = Uuid::new_v4();
        let mut app = App::with_parts(store, Box::new(NullNotifier), Box::new(FixedIds(id)));

        let mut form = app.open_task_form(None);
        assert_eq!(app.navigator.current(), Screen::TaskForm { task_id: None });

        form.set_title("New Task");
        form.set_description("Task Description");
        form.set_due_date(to_local_date(Utc::now()) + Duration::days(1));

        assert!(app.submit_form(&mut form));
        assert_eq!(app.navigator.current(), Screen::TaskList);
        assert_eq!(app.store.get(id).expect("task stored").title, "New Task");
    }
}
