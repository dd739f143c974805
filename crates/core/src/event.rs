//! Domain event system — decoupled communication between bounded contexts.
//!
//! Events are published when something interesting happens in the system.
//! Other components (the CLI status line, tests, future telemetry) can
//! subscribe to react without tight coupling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A user turn finished processing
    TurnCompleted {
        session_id: String,
        model: String,
        tokens_used: u32,
        timestamp: DateTime<Utc>,
    },

    /// A tool was executed
    ToolExecuted {
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A document was ingested and indexed
    DocumentIngested {
        document_id: String,
        chunks: usize,
        timestamp: DateTime<Utc>,
    },

    /// A viewing schedule was curated
    ScheduleBuilt {
        session_id: String,
        items: usize,
        total_minutes: u32,
        timestamp: DateTime<Utc>,
    },

    /// An error occurred
    ErrorOccurred {
        context: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub. Components
/// subscribe to receive all events and filter for what they care about.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
