//! User-facing notification types and the in-process notification bus
//!
//! Every user-visible success/error raised by the console flows through the
//! [`Notifier`] trait. [`NotificationBus`] is the shipped implementation: it
//! fans notifications out to subscribers via `tokio::broadcast` and keeps a
//! capped log of recent notifications for the notification panel.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// One user-facing notification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique id for this record
    pub id: Uuid,
    pub kind: NotificationKind,
    /// Short headline shown in the toast
    pub title: String,
    /// Longer human-readable detail
    pub detail: String,
    /// Originating subsystem (e.g. "settings", "library")
    pub category: String,
    /// When the notification was raised
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: &str, detail: &str, category: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            detail: detail.to_string(),
            category: category.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Sink for user-visible success/error feedback
///
/// Components that need to report to the user take an `Arc<dyn Notifier>`
/// rather than a concrete bus, so tests can substitute a recording stub.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, title: &str, detail: &str, category: &str);
}

/// Central notification distribution bus
///
/// Uses `tokio::broadcast` internally:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
///
/// In addition to live fan-out, the bus retains the most recent
/// notifications (bounded by `log_capacity`) so a notification panel opened
/// after the fact can still render history.
///
/// # Examples
///
/// ```
/// use figcon_common::notify::{NotificationBus, NotificationKind, Notifier};
///
/// let bus = NotificationBus::new(100, 32);
/// let _rx = bus.subscribe();
///
/// bus.notify(NotificationKind::Info, "Hello", "details", "demo");
/// assert_eq!(bus.recent().len(), 1);
/// ```
pub struct NotificationBus {
    tx: broadcast::Sender<Notification>,
    log: Mutex<VecDeque<Notification>>,
    log_capacity: usize,
}

impl NotificationBus {
    /// Creates a new bus with the given broadcast channel capacity and
    /// retained-log capacity.
    pub fn new(channel_capacity: usize, log_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity);
        Self {
            tx,
            log: Mutex::new(VecDeque::with_capacity(log_capacity)),
            log_capacity,
        }
    }

    /// Subscribe to all future notifications
    ///
    /// Notifications raised before subscription are not delivered here; use
    /// [`recent`](Self::recent) for history.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// The retained notification log, oldest first
    pub fn recent(&self) -> Vec<Notification> {
        self.log.lock().unwrap().iter().cloned().collect()
    }

    /// Drop all retained notifications
    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    fn push(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => tracing::warn!(
                category = %notification.category,
                title = %notification.title,
                detail = %notification.detail,
                "user notification (error)"
            ),
            _ => tracing::debug!(
                category = %notification.category,
                title = %notification.title,
                "user notification"
            ),
        }

        {
            let mut log = self.log.lock().unwrap();
            if log.len() == self.log_capacity {
                log.pop_front();
            }
            log.push_back(notification.clone());
        }

        // No subscribers is fine; the retained log still records it.
        let _ = self.tx.send(notification);
    }
}

impl Notifier for NotificationBus {
    fn notify(&self, kind: NotificationKind, title: &str, detail: &str, category: &str) {
        self.push(Notification::new(kind, title, detail, category));
    }
}
