//! In-memory queue store, for tests and ephemeral sessions.

use crate::ports::outbound::QueueStore;
use pay_types::{QueueError, QueuedTransaction};
use std::sync::Mutex;
use uuid::Uuid;

/// Volatile store with the same contract as the durable one.
///
/// Useful wherever durability across process restarts is not needed:
/// unit tests, previews, and the in-memory fallback when the platform
/// denies disk access.
pub struct MemoryQueueStore {
    records: Mutex<Vec<QueuedTransaction>>,
    device_id: Uuid,
}

impl MemoryQueueStore {
    /// Creates an empty store with a fresh device id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            device_id: Uuid::new_v4(),
        }
    }

    /// Creates a store pre-seeded with records, as if persisted by a
    /// previous session.
    #[must_use]
    pub fn with_records(records: Vec<QueuedTransaction>) -> Self {
        Self {
            records: Mutex::new(records),
            device_id: Uuid::new_v4(),
        }
    }

    /// Raw persisted records, including statuses `load()` would filter.
    #[must_use]
    pub fn raw_records(&self) -> Vec<QueuedTransaction> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryQueueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueStore for MemoryQueueStore {
    fn load(&self) -> Result<Vec<QueuedTransaction>, QueueError> {
        let records = self
            .records
            .lock()
            .map_err(|_| QueueError::PersistenceFailed {
                reason: "store lock poisoned".to_string(),
            })?
            .clone();
        Ok(super::recover_pending(records))
    }

    fn save_all(&self, queue: &[QueuedTransaction]) -> Result<(), QueueError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| QueueError::PersistenceFailed {
                reason: "store lock poisoned".to_string(),
            })?;
        *records = queue.to_vec();
        Ok(())
    }

    fn device_id(&self) -> Result<Uuid, QueueError> {
        Ok(self.device_id)
    }
}
