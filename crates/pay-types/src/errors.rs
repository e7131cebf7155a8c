//! Error taxonomy for the offline queue.
//!
//! `enqueue` and `trigger_sync` surface these synchronously; per-record
//! drain failures are captured and reported via events instead of being
//! thrown out of the drain loop.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Which enqueue-time ceiling was hit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitViolation {
    /// Single-transaction amount exceeds the offline ceiling.
    #[error("amount {amount} exceeds offline ceiling {maximum}")]
    AmountCeiling { amount: Decimal, maximum: Decimal },

    /// Queue is at capacity.
    #[error("queue full at {capacity} transactions")]
    QueueCapacity { capacity: usize },
}

/// Offline queue error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Enqueue rejected by an amount or capacity ceiling. Surfaced
    /// synchronously to the caller; never retried.
    #[error("limit exceeded: {0}")]
    LimitExceeded(LimitViolation),

    /// The signer could not obtain a valid local authentication; the
    /// enqueue aborts with nothing persisted.
    #[error("authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// Amount was zero or negative.
    #[error("amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },

    /// Stored signature no longer validates against the payload.
    /// Non-retryable: the record is evicted on first detection.
    #[error("signature invalid for transaction {id}")]
    SignatureInvalid { id: Uuid },

    /// Remote API call failed (network, validation, server). Retryable
    /// up to the configured ceiling.
    #[error("remote call failed for transaction {id}: {reason}")]
    RemoteCallFailed { id: Uuid, reason: String },

    /// Store read/write failed. Logged, never fatal to the in-memory
    /// queue; risks loss only on crash.
    #[error("persistence failed: {reason}")]
    PersistenceFailed { reason: String },

    /// Invariant violation or unexpected internal state.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QueueError {
    /// Returns true if a sync-time occurrence of this error should count
    /// against the retry ceiling rather than evict immediately.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteCallFailed { .. })
    }
}
