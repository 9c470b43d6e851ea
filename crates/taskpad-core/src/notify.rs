use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Toast {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Success,
        }
    }
}

/// Fire-and-forget toast sink. The signature is infallible on purpose:
/// notification failures must never reach task state.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

/// Writes toasts to the log; stands in when no toast UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        info!(title = %toast.title, severity = ?toast.severity, "{}", toast.message);
    }
}

/// Drops every toast. Used when notifications are configured off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _toast: Toast) {}
}
