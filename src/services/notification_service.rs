use tokio::sync::broadcast;

use crate::{
    constants::NOTIFICATION_CHANNEL_CAPACITY,
    models::{Notification, NotificationLevel},
};

/// User-visible toast sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn info(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Info, message));
    }

    fn success(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Success, message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Error, message));
    }
}

/// Fans notifications out to every connected websocket.
#[derive(Clone)]
pub struct NotificationService {
    sender: broadcast::Sender<Notification>,
}

impl NotificationService {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationService {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::error!("{}", notification.message),
            _ => tracing::info!("{}", notification.message),
        }
        // Err only means nobody is subscribed.
        let _ = self.sender.send(notification);
    }
}
