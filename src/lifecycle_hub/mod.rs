//! LifecycleHub - View Mounted Notifications
//!
//! ## Responsibilities
//!
//! - Subscriber registration/unregistration
//! - Broadcasting a "view mounted" signal after markup replacement
//!
//! Features that bind handlers into view markup (sidebar camera drag,
//! table bindings) subscribe here instead of coupling to the router.

use crate::view_router::ViewId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Notification sent after a view is shown and its markup settled
#[derive(Debug, Clone)]
pub struct ViewMounted {
    pub view: ViewId,
    /// Whether this mount re-showed already cached content
    pub cached: bool,
    pub mounted_at: DateTime<Utc>,
}

/// Registered subscriber
struct Subscriber {
    id: Uuid,
    tx: mpsc::UnboundedSender<ViewMounted>,
}

/// LifecycleHub instance
pub struct LifecycleHub {
    subscribers: RwLock<HashMap<Uuid, Subscriber>>,
}

impl LifecycleHub {
    /// Create new LifecycleHub
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a subscriber
    pub async fn subscribe(&self) -> (Uuid, mpsc::UnboundedReceiver<ViewMounted>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        {
            let mut subscribers = self.subscribers.write().await;
            subscribers.insert(id, Subscriber { id, tx });
        }

        tracing::debug!(subscriber_id = %id, "Lifecycle subscriber registered");
        (id, rx)
    }

    /// Remove a subscriber
    pub async fn unsubscribe(&self, id: &Uuid) {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.remove(id).is_some() {
            tracing::debug!(subscriber_id = %id, "Lifecycle subscriber removed");
        }
    }

    /// Broadcast a view-mounted notification to all subscribers
    pub async fn broadcast(&self, view: ViewId, cached: bool) {
        let note = ViewMounted {
            view,
            cached,
            mounted_at: Utc::now(),
        };

        let subscribers = self.subscribers.read().await;
        tracing::debug!(
            view = %view.as_str(),
            cached = cached,
            subscriber_count = subscribers.len(),
            "Broadcasting view mounted"
        );

        for subscriber in subscribers.values() {
            if subscriber.tx.send(note.clone()).is_err() {
                tracing::warn!(
                    subscriber_id = %subscriber.id,
                    "Failed to notify lifecycle subscriber"
                );
            }
        }
    }

    /// Subscriber count
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

impl Default for LifecycleHub {
    fn default() -> Self {
        Self::new()
    }
}
