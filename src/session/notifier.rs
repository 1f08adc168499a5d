use serde::Deserialize;
use tracing::{debug, info};

/// Whether the user allowed local notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// Not asked yet
    #[default]
    Default,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Best-effort local notifications.
///
/// Delivery is fire-and-forget; nothing in the session depends on a
/// notification being shown.
pub trait Notifier: Send + Sync {
    fn permission(&self) -> NotificationPermission;

    /// Ask for permission and return the resulting state
    fn request_permission(&self) -> NotificationPermission;

    fn notify(&self, notification: Notification);
}

/// Send `notification` if permitted, asking first when the user was never
/// asked.
pub fn notify_if_permitted(notifier: &dyn Notifier, notification: Notification) {
    let permission = match notifier.permission() {
        NotificationPermission::Default => notifier.request_permission(),
        other => other,
    };

    if permission == NotificationPermission::Granted {
        notifier.notify(notification);
    } else {
        debug!(title = %notification.title, ?permission, "Notification suppressed");
    }
}

/// Writes notifications to the log.
///
/// There is no one to prompt in a server process, so a permission request
/// leaves an undecided permission unchanged.
pub struct LogNotifier {
    permission: NotificationPermission,
}

impl LogNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        Self { permission }
    }
}

impl Notifier for LogNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&self) -> NotificationPermission {
        let permission = self.permission();
        debug!(?permission, "Notification permission requested");
        permission
    }

    fn notify(&self, notification: Notification) {
        info!(
            title = %notification.title,
            body = %notification.body,
            "Notification"
        );
    }
}

/// Test notifier that records what was sent
#[cfg(test)]
pub(crate) struct RecordingNotifier {
    permission: std::sync::Mutex<NotificationPermission>,
    /// Permission granted when asked
    answer: NotificationPermission,
    pub sent: std::sync::Mutex<Vec<Notification>>,
    pub requests: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new(permission: NotificationPermission, answer: NotificationPermission) -> Self {
        Self {
            permission: std::sync::Mutex::new(permission),
            answer,
            sent: std::sync::Mutex::new(Vec::new()),
            requests: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn granted() -> Self {
        Self::new(NotificationPermission::Granted, NotificationPermission::Granted)
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self) -> NotificationPermission {
        self.requests.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut permission = self.permission.lock().unwrap();
        *permission = self.answer;
        *permission
    }

    fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}
