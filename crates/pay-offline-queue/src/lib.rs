//! # Offline Transaction Queue & Synchronization Engine
//!
//! Lets a user initiate payments while disconnected: transactions are
//! validated, enriched with device context, cryptographically signed after
//! a live auth challenge, persisted durably, and reconciled with an
//! idempotent remote API once connectivity returns.
//!
//! ## Per-Transaction State Machine
//!
//! ```text
//! [PENDING] ──drain──→ [SYNCING] ──ack──→ removed, `Synced` emitted
//!                          │
//!                          ├── retryable failure, under ceiling ──→ [PENDING]
//!                          └── ceiling hit / bad signature ──→ evicted, `Failed` emitted
//! ```
//!
//! ## Drain Guarantees
//!
//! | Guarantee | Enforcement |
//! |-----------|-------------|
//! | Ordering by creation time | `domain/queue.rs` - `snapshot_ordered()` |
//! | One-at-a-time submission | `service.rs` - sequential loop with inter-item delay |
//! | Single drain at a time | `service.rs` - `sync_in_progress` compare-exchange |
//! | At-least-once, idempotent | record kept until remote ack; `id` is the idempotency key |
//! | Signature-invalid never retried | `service.rs` - evicted on first failed verify |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - file/memory stores, watch-channel connectivity,    │
//! │              HMAC signer, static device info                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - OfflineQueueApi trait                      │
//! │  ports/outbound.rs - QueueStore, RemoteTransactionApi,          │
//! │                      ConnectivityMonitor, TransactionSigner,    │
//! │                      DeviceInfoProvider, LocationProvider,      │
//! │                      TimeSource traits                          │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/queue.rs - TransactionQueue (id index, creation-time    │
//! │                    ordering, capacity, currency aggregation)    │
//! │  service.rs      - OfflineQueueService facade + sync engine     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod test_utils;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::{OfflineQueueService, QueuePorts};
