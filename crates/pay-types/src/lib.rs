//! # Pay Types - Shared Domain Types
//!
//! Single source of truth for the entities, configuration, and error
//! taxonomy used by the offline transaction queue. Every other crate in
//! the workspace depends on this one; it depends on nothing internal.

pub mod config;
pub mod entities;
pub mod errors;
pub mod report;

pub use config::QueueConfig;
pub use entities::{
    canonical_payload, CurrencyExposure, GeoPoint, NetworkType, NewTransaction, QueuedTransaction, Recipient,
    RemoteAck, SignedEnvelope, Timestamp, TransactionKind, TransactionStatus, TxMetadata,
};
pub use errors::{LimitViolation, QueueError};
pub use report::{RecordOutcome, RecordResult, SyncReport};

/// Storage key for the persisted queue document.
pub const OFFLINE_TRANSACTIONS_KEY: &str = "offline_transactions";

/// Storage key for the stable per-install device identifier.
pub const DEVICE_ID_KEY: &str = "device_id";
