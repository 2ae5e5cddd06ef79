//! Event Bus - reader lifecycle notifications
//!
//! Design: plain enum events over a tokio broadcast channel.
//! Publishing never blocks and never fails the caller.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::EntityName;

/// Reader events that can be dispatched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReaderEvent {
    LoadStarted { entity: EntityName, path: String },
    LoadSucceeded { entity: EntityName, path: String },
    LoadFailed { entity: EntityName, path: String, message: String },
    /// A newer load replaced this one before it resolved
    LoadSuperseded { entity: EntityName, path: String },
    Rendered { entity: EntityName, path: String },
    Navigated { url: String },
    Unmounted,
}

/// Simple event bus using tokio broadcast channel
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ReaderEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    /// Publish an event
    pub fn publish(&self, event: ReaderEvent) {
        let _ = self.tx.send(event); // Ignore error if no subscribers
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ReaderEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(ReaderEvent::Unmounted);

        match rx.recv().await {
            Ok(ReaderEvent::Unmounted) => {}
            _ => panic!("Expected Unmounted event"),
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        bus.publish(ReaderEvent::Navigated {
            url: "http://localhost/docs".to_string(),
        });
    }
}
