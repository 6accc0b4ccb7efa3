//! Real-time notifications. A broadcast channel fans server events out to
//! every connected WebSocket; senders emit only after the corresponding
//! write has been persisted.

use crate::models::ContactRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    ContentUpdated { timestamp: DateTime<Utc> },
    #[serde(rename_all = "camelCase")]
    NewContact {
        id: String,
        name: String,
        email: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Authenticated { success: bool },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ServerEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    pub fn content_updated(&self) {
        self.send(ServerEvent::ContentUpdated {
            timestamp: Utc::now(),
        });
    }

    pub fn new_contact(&self, contact: &ContactRecord) {
        self.send(ServerEvent::NewContact {
            id: contact.id.clone(),
            name: contact.fullname.clone(),
            email: contact.email.clone(),
            timestamp: contact.timestamp,
        });
    }

    fn send(&self, event: ServerEvent) {
        // No receivers is normal; nobody may be watching.
        if self.tx.send(event).is_err() {
            tracing::debug!("Event dropped: no live subscribers");
        }
    }
}
