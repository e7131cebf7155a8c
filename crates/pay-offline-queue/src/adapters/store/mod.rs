//! Queue store adapters.

pub mod file;
pub mod memory;

pub use file::FileQueueStore;
pub use memory::MemoryQueueStore;

use pay_types::{QueuedTransaction, TransactionStatus};

/// Restricts a loaded document to records that should be retried.
///
/// `Pending` records pass through; `Syncing` leftovers from a mid-drain
/// crash are reset to `Pending` and retried from scratch (the remote API
/// deduplicates on id); `Completed`/`Failed` stragglers are dropped.
pub(crate) fn recover_pending(records: Vec<QueuedTransaction>) -> Vec<QueuedTransaction> {
    records
        .into_iter()
        .filter_map(|mut tx| match tx.status {
            TransactionStatus::Pending => Some(tx),
            TransactionStatus::Syncing => {
                tx.status = TransactionStatus::Pending;
                Some(tx)
            }
            TransactionStatus::Completed | TransactionStatus::Failed => None,
        })
        .collect()
}
