//! # Transaction Queue - In-Memory Pending Set
//!
//! Id-indexed store of queued transactions with creation-time-ordered
//! snapshots for the drain loop and per-currency aggregation for the UI.
//!
//! Invariants enforced here:
//! - No duplicate transaction ids (checked in `insert()`)
//! - Queue length never exceeds the configured capacity (checked in
//!   `insert()`, before the record is stored)

use pay_types::{
    CurrencyExposure, LimitViolation, QueueError, QueuedTransaction, TransactionStatus,
};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// In-memory set of transactions awaiting submission.
///
/// Ordering is derived from `metadata.created_at` at snapshot time, not
/// from insertion order. A record re-queued after a failed attempt keeps
/// its original position in the next drain.
#[derive(Debug)]
pub struct TransactionQueue {
    /// Maximum records held at once.
    capacity: usize,

    /// All queued transactions indexed by id.
    by_id: HashMap<Uuid, QueuedTransaction>,
}

impl TransactionQueue {
    /// Creates an empty queue with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            by_id: HashMap::new(),
        }
    }

    /// Returns the number of queued transactions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Returns the configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Checks if a transaction is queued.
    #[must_use]
    pub fn contains(&self, id: &Uuid) -> bool {
        self.by_id.contains_key(id)
    }

    /// Gets a queued transaction by id.
    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<&QueuedTransaction> {
        self.by_id.get(id)
    }

    /// Gets a mutable queued transaction by id.
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut QueuedTransaction> {
        self.by_id.get_mut(id)
    }

    /// Adds a transaction to the queue.
    ///
    /// # Errors
    /// - `LimitExceeded(QueueCapacity)` if the queue is full
    /// - `Internal` if the id is already queued
    pub fn insert(&mut self, tx: QueuedTransaction) -> Result<(), QueueError> {
        if self.by_id.len() >= self.capacity {
            return Err(QueueError::LimitExceeded(LimitViolation::QueueCapacity {
                capacity: self.capacity,
            }));
        }
        if self.by_id.contains_key(&tx.id) {
            return Err(QueueError::Internal(format!(
                "duplicate transaction id {}",
                tx.id
            )));
        }
        self.by_id.insert(tx.id, tx);
        Ok(())
    }

    /// Removes a transaction, returning it if it was queued.
    pub fn remove(&mut self, id: &Uuid) -> Option<QueuedTransaction> {
        self.by_id.remove(id)
    }

    /// Sets the status of a queued transaction. Returns false if unknown.
    pub fn set_status(&mut self, id: &Uuid, status: TransactionStatus) -> bool {
        match self.by_id.get_mut(id) {
            Some(tx) => {
                tx.status = status;
                true
            }
            None => false,
        }
    }

    /// Snapshot of the queue sorted by creation time, oldest first.
    ///
    /// This is the submission order guarantee: transactions drain in the
    /// order the user created them, regardless of insertion or retry order.
    #[must_use]
    pub fn snapshot_ordered(&self) -> Vec<QueuedTransaction> {
        let mut records: Vec<QueuedTransaction> = self.by_id.values().cloned().collect();
        records.sort_by_key(QueuedTransaction::sort_key);
        records
    }

    /// Aggregate queued amounts per currency, for pending-exposure display.
    #[must_use]
    pub fn balance_by_currency(&self) -> BTreeMap<String, CurrencyExposure> {
        let mut balances: BTreeMap<String, CurrencyExposure> = BTreeMap::new();
        for tx in self.by_id.values() {
            let entry = balances.entry(tx.currency.clone()).or_default();
            entry.total += tx.amount;
            entry.count += 1;
        }
        balances
    }
}
