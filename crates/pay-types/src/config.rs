//! Queue configuration.

use rust_decimal::Decimal;
use std::time::Duration;

/// Fixed operating limits for the offline queue.
///
/// These are construction-time constants, not runtime-tunable settings;
/// every limit is enforced at `enqueue` time or inside the drain loop.
#[derive(Clone, Debug, PartialEq)]
pub struct QueueConfig {
    /// Failed remote submissions before a transaction is evicted.
    pub max_retries: u32,
    /// Maximum queued transactions; enqueue fails beyond this.
    pub max_queue_size: usize,
    /// Per-transaction amount ceiling while offline.
    pub max_offline_amount: Decimal,
    /// Safety-net timer between drain attempts.
    pub periodic_sync_interval: Duration,
    /// Throttle between consecutive submissions within one drain.
    pub inter_item_delay: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_queue_size: 50,
            max_offline_amount: Decimal::from(5000),
            periodic_sync_interval: Duration::from_secs(30),
            inter_item_delay: Duration::from_millis(500),
        }
    }
}

impl QueueConfig {
    /// Tightened limits and near-zero delays for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            max_queue_size: 4,
            max_offline_amount: Decimal::from(100),
            periodic_sync_interval: Duration::from_millis(50),
            inter_item_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }
}
