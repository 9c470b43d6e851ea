use tracing::debug;
use uuid::Uuid;

/// The two named destinations. The form screen optionally carries the id of
/// a task to edit; without one it opens in create mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TaskList,
    TaskForm { task_id: Option<Uuid> },
}

/// A screen stack rooted at the task list.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: vec![Screen::TaskList],
        }
    }
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::TaskList)
    }

    pub fn navigate(&mut self, screen: Screen) {
        debug!(?screen, "navigate");
        self.stack.push(screen);
    }

    /// Returns to the previous screen. The root list screen is never popped.
    pub fn go_back(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        debug!(current = ?self.current(), "went back");
    }
}
