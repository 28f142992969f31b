//! Ephemeral user-facing notifications.
//!
//! The queue only records notification requests. Rendering and timing the
//! on-screen toast is up to the consumer, which calls [`NotificationQueue::expire`]
//! on its own tick or [`NotificationQueue::dismiss`] on user action.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Cart,
    Wishlist,
}

impl NotificationKind {
    /// Lowercase name, as shown in logs and CLI output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
        }
    }
}

/// A single queued notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
}

/// Insertion-ordered queue of notifications. Never persisted.
///
/// Cheaply cloneable; clones share the same queue.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<NotificationQueueInner>,
}

struct NotificationQueueInner {
    display_duration: Duration,
    entries: RwLock<Vec<Notification>>,
}

impl NotificationQueue {
    /// Create an empty queue whose entries expire after `display_duration`.
    #[must_use]
    pub fn new(display_duration: Duration) -> Self {
        Self {
            inner: Arc::new(NotificationQueueInner {
                display_duration,
                entries: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Append a notification and return its ID.
    ///
    /// Identical messages are not merged; each gets its own entry.
    pub fn enqueue(&self, message: impl Into<String>, kind: NotificationKind) -> String {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            message: message.into(),
            kind,
            created_at: Instant::now(),
        };
        let id = notification.id.clone();

        tracing::debug!(id = %id, kind = kind.as_str(), "Notification enqueued");
        self.inner.entries.write().push(notification);
        id
    }

    /// Remove a notification. Unknown or already-expired IDs are ignored.
    pub fn dismiss(&self, id: &str) {
        self.inner.entries.write().retain(|n| n.id != id);
    }

    /// Drop every notification older than the display duration.
    ///
    /// Returns the number of notifications removed.
    pub fn expire(&self) -> usize {
        self.expire_at(Instant::now())
    }

    fn expire_at(&self, now: Instant) -> usize {
        let ttl = self.inner.display_duration;
        let mut entries = self.inner.entries.write();
        let before = entries.len();
        entries.retain(|n| now.saturating_duration_since(n.created_at) < ttl);
        before - entries.len()
    }

    /// Current notifications, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.inner.entries.read().clone()
    }

    /// Remove and return every notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.inner.entries.write())
    }

    /// Number of queued notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// How long a notification stays visible.
    #[must_use]
    pub fn display_duration(&self) -> Duration {
        self.inner.display_duration
    }
}
