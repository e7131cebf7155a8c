//! # Inbound Port - OfflineQueueApi
//!
//! Primary driving port exposing the queue facade to UI and
//! state-management layers. Event emission is not part of this trait;
//! consumers subscribe to the bus directly.

use async_trait::async_trait;
use pay_types::{CurrencyExposure, NewTransaction, QueueError, QueuedTransaction, SyncReport};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Public API of the offline transaction queue.
///
/// # Example
///
/// ```rust,ignore
/// use pay_offline_queue::ports::OfflineQueueApi;
///
/// async fn example(queue: &impl OfflineQueueApi) {
///     let tx = queue.enqueue(request).await?;
///     let exposure = queue.balance_by_currency().await;
///     let report = queue.trigger_sync().await?;
/// }
/// ```
#[async_trait]
pub trait OfflineQueueApi: Send + Sync {
    /// Validates, enriches, signs, persists, and queues a new transaction.
    ///
    /// Triggers a drain if currently online.
    ///
    /// # Errors
    /// - `InvalidAmount`: amount is zero or negative
    /// - `LimitExceeded`: amount above the offline ceiling, or queue full
    /// - `AuthenticationFailed`: the live auth challenge failed; nothing
    ///   is persisted
    async fn enqueue(&self, request: NewTransaction) -> Result<QueuedTransaction, QueueError>;

    /// Removes a transaction before it is submitted.
    ///
    /// Returns false if the id is not queued. Cannot abort a record that
    /// is already mid-submission; the in-flight network call completes as
    /// if uncancelled.
    async fn cancel(&self, id: Uuid) -> bool;

    /// Read-only snapshot of the queue in creation order.
    ///
    /// Returns independent copies; mutating them does not affect the
    /// queue.
    async fn list(&self) -> Vec<QueuedTransaction>;

    /// Aggregate of queued, not-yet-synced amounts per currency.
    async fn balance_by_currency(&self) -> BTreeMap<String, CurrencyExposure>;

    /// Runs one drain pass against the remote API.
    ///
    /// Returns an empty report without draining when offline or when a
    /// drain is already in progress; callers that need the outcome of the
    /// in-flight drain should await its `SyncCompleted` event instead.
    async fn trigger_sync(&self) -> Result<SyncReport, QueueError>;

    /// Number of queued transactions.
    async fn pending_count(&self) -> usize;

    /// True if nothing is queued.
    async fn is_empty(&self) -> bool;
}
