//! Test helpers shared by unit tests and the integration suite.
//!
//! Exposed as a normal module so downstream test crates can drive the
//! service with a scripted remote API and deterministic time.

use crate::ports::outbound::{RemoteTransactionApi, TimeSource};
use async_trait::async_trait;
use pay_types::{
    NetworkType, NewTransaction, QueueError, QueuedTransaction, Recipient, RemoteAck,
    SignedEnvelope, Timestamp, TransactionKind, TransactionStatus, TxMetadata,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Remote API double with per-transaction scripted failures.
///
/// By default every submission succeeds with a fresh remote id. Use
/// [`fail_times`](Self::fail_times) to make the first `n` submissions of
/// a given transaction fail with a retryable error. Every call is
/// recorded in arrival order.
#[derive(Debug, Default)]
pub struct MockRemoteApi {
    remaining_failures: Mutex<HashMap<Uuid, u32>>,
    call_order: Mutex<Vec<Uuid>>,
}

impl MockRemoteApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next `n` submissions of `id` to fail with a
    /// retryable `RemoteCallFailed`.
    pub fn fail_times(&self, id: Uuid, n: u32) {
        if let Ok(mut failures) = self.remaining_failures.lock() {
            failures.insert(id, n);
        }
    }

    /// Every submission received so far, in arrival order.
    #[must_use]
    pub fn call_order(&self) -> Vec<Uuid> {
        self.call_order
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of submissions received for `id`.
    #[must_use]
    pub fn calls_for(&self, id: Uuid) -> usize {
        self.call_order
            .lock()
            .map(|calls| calls.iter().filter(|c| **c == id).count())
            .unwrap_or(0)
    }

    fn submit(&self, tx: &QueuedTransaction) -> Result<RemoteAck, QueueError> {
        if let Ok(mut calls) = self.call_order.lock() {
            calls.push(tx.id);
        }
        let should_fail = self
            .remaining_failures
            .lock()
            .map(|mut failures| match failures.get_mut(&tx.id) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            })
            .unwrap_or(false);
        if should_fail {
            return Err(QueueError::RemoteCallFailed {
                id: tx.id,
                reason: "scripted network failure".to_string(),
            });
        }
        Ok(RemoteAck {
            transaction_id: format!("remote-{}", tx.id),
        })
    }
}

#[async_trait]
impl RemoteTransactionApi for MockRemoteApi {
    async fn create_payment(&self, tx: &QueuedTransaction) -> Result<RemoteAck, QueueError> {
        self.submit(tx)
    }

    async fn create_money_request(&self, tx: &QueuedTransaction) -> Result<RemoteAck, QueueError> {
        self.submit(tx)
    }

    async fn create_transfer(&self, tx: &QueuedTransaction) -> Result<RemoteAck, QueueError> {
        self.submit(tx)
    }
}

/// Deterministic time source for ordering-sensitive tests.
#[derive(Debug, Default)]
pub struct ManualTime {
    now_ms: AtomicU64,
}

impl ManualTime {
    #[must_use]
    pub fn new(now_ms: Timestamp) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: Timestamp) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: Timestamp) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Timestamp {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Minimal valid enqueue request for tests.
#[must_use]
pub fn payment_request(amount: Decimal, currency: &str) -> NewTransaction {
    NewTransaction {
        kind: TransactionKind::Payment,
        amount,
        currency: currency.to_string(),
        recipient: Recipient::Id("test-recipient".to_string()),
        description: None,
    }
}

/// Fully-populated pending record, bypassing the enqueue path. The
/// envelope carries placeholder bytes; use the real signer where
/// signature checks matter.
#[must_use]
pub fn queued_record(amount: Decimal, currency: &str, created_at: Timestamp) -> QueuedTransaction {
    QueuedTransaction {
        id: Uuid::new_v4(),
        kind: TransactionKind::Payment,
        amount,
        currency: currency.to_string(),
        recipient: Recipient::Id("test-recipient".to_string()),
        description: None,
        metadata: TxMetadata {
            created_at,
            device_id: Uuid::new_v4(),
            location: None,
            network: NetworkType::Unknown,
            battery_level: None,
        },
        status: TransactionStatus::Pending,
        retry_count: 0,
        envelope: SignedEnvelope {
            payload: b"test-payload".to_vec(),
            signature: b"test-signature".to_vec(),
        },
    }
}
