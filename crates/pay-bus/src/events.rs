//! Queue lifecycle events.
//!
//! Each event is a tagged variant carrying its payload, so consumers get a
//! statically checkable contract instead of stringly-typed emitter names.

use pay_types::{NetworkType, QueuedTransaction, SyncReport};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All events published by the offline queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueueEvent {
    // =========================================================================
    // QUEUE LIFECYCLE
    // =========================================================================
    /// A transaction was validated, signed, and queued.
    Created(QueuedTransaction),

    /// A queued transaction was cancelled before submission.
    Cancelled {
        /// The cancelled transaction's id.
        id: Uuid,
    },

    // =========================================================================
    // SYNC ENGINE
    // =========================================================================
    /// A drain pass started.
    SyncStarted {
        /// Queued transactions at the start of the pass.
        pending: usize,
    },

    /// A transaction was acknowledged by the remote API and removed.
    Synced {
        transaction: QueuedTransaction,
        /// Server-side transaction identifier from the acknowledgment.
        remote_id: String,
    },

    /// A transaction was evicted: retry ceiling hit or signature invalid.
    Failed {
        transaction: QueuedTransaction,
        /// Terminal error description.
        reason: String,
    },

    /// A drain pass finished, including no-op passes over an empty queue.
    SyncCompleted(SyncReport),

    // =========================================================================
    // CONNECTIVITY
    // =========================================================================
    /// The connectivity predicate flipped.
    ConnectivityChanged {
        online: bool,
        network: NetworkType,
    },
}

impl QueueEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Created(_) | Self::Cancelled { .. } => EventTopic::Queue,
            Self::SyncStarted { .. }
            | Self::Synced { .. }
            | Self::Failed { .. }
            | Self::SyncCompleted(_) => EventTopic::Sync,
            Self::ConnectivityChanged { .. } => EventTopic::Connectivity,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Enqueue and cancel events.
    Queue,
    /// Drain lifecycle and per-record outcomes.
    Sync,
    /// Online/offline transitions.
    Connectivity,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &QueueEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
