//! Core domain entities for the offline transaction queue.
//!
//! The central type is [`QueuedTransaction`]: a pending financial intent
//! created while the device may be offline, signed once at creation, and
//! held until the remote API acknowledges it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// Which remote endpoint a queued transaction is dispatched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Send money to a recipient.
    Payment,
    /// Request money from a counterparty.
    MoneyRequest,
    /// Move money between own accounts.
    Transfer,
}

impl TransactionKind {
    /// Stable name used in the canonical signed payload.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::MoneyRequest => "money_request",
            Self::Transfer => "transfer",
        }
    }
}

/// Counterparty addressing. Which variant is required depends on the
/// transaction kind and is validated server-side, not at this layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// Internal account identifier.
    Id(String),
    /// Phone number (E.164 or local).
    Phone(String),
    /// Email address.
    Email(String),
}

impl Recipient {
    /// Stable rendering used in the canonical signed payload.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Id(v) => format!("id:{v}"),
            Self::Phone(v) => format!("phone:{v}"),
            Self::Email(v) => format!("email:{v}"),
        }
    }
}

/// Network transport reported by the platform connectivity API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    Wifi,
    Cellular,
    /// No connectivity at capture time.
    Offline,
    #[default]
    Unknown,
}

/// Best-effort device location captured at creation time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Immutable audit snapshot captured once when the transaction is created.
///
/// `created_at` is the ordering key for the sync engine; it is never
/// re-derived after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TxMetadata {
    /// Creation time in milliseconds since UNIX epoch.
    pub created_at: Timestamp,
    /// Stable per-install device identifier.
    pub device_id: Uuid,
    /// Approximate location, if the platform granted it.
    pub location: Option<GeoPoint>,
    /// Network transport at creation time.
    pub network: NetworkType,
    /// Battery level in `[0.0, 1.0]`, if the platform reports it.
    pub battery_level: Option<f32>,
}

/// Opaque signing artifacts produced once at creation.
///
/// The signature binds id, kind, amount, currency, recipient, and creation
/// timestamp. It is verified before every sync attempt and never
/// regenerated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// Canonical payload bytes the signature covers.
    pub payload: Vec<u8>,
    /// Signature over `payload`, produced after a live auth challenge.
    pub signature: Vec<u8>,
}

/// Transaction state while owned by the queue.
///
/// ```text
/// [PENDING] ──drain──→ [SYNCING] ──ack──→ [COMPLETED] (removed)
///                          │
///                          ├── retryable failure, under ceiling ──→ [PENDING]
///                          └── ceiling hit / bad signature ──→ [FAILED] (evicted)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting submission.
    #[default]
    Pending,
    /// Mid-submission during a drain pass.
    Syncing,
    /// Acknowledged by the remote API.
    Completed,
    /// Evicted after the retry ceiling or a failed signature check.
    Failed,
}

/// Caller-supplied fields for a new offline transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: String,
    pub recipient: Recipient,
    pub description: Option<String>,
}

/// A pending financial intent awaiting submission to the remote API.
///
/// The `id` doubles as the idempotency key for the remote API and the
/// storage key; it is immutable and unique for the lifetime of the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueuedTransaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    /// Positive amount in `currency` units.
    pub amount: Decimal,
    /// ISO-like currency code, e.g. "USD".
    pub currency: String,
    pub recipient: Recipient,
    pub description: Option<String>,
    pub metadata: TxMetadata,
    pub status: TransactionStatus,
    /// Failed sync attempts so far. Monotonically non-decreasing while the
    /// record is queued.
    pub retry_count: u32,
    pub envelope: SignedEnvelope,
}

impl QueuedTransaction {
    /// Returns true if the transaction is awaiting submission.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    /// Returns true if the transaction is mid-submission.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.status == TransactionStatus::Syncing
    }

    /// Ordering key for drain passes: creation time, id as tiebreaker.
    #[must_use]
    pub fn sort_key(&self) -> (Timestamp, Uuid) {
        (self.metadata.created_at, self.id)
    }
}

/// Builds the canonical payload the signature binds.
///
/// Deterministic rendering of id, kind, amount, currency, recipient, and
/// creation timestamp. Any change to these fields after signing makes the
/// stored signature fail verification.
#[must_use]
pub fn canonical_payload(
    id: Uuid,
    kind: TransactionKind,
    amount: Decimal,
    currency: &str,
    recipient: &Recipient,
    created_at: Timestamp,
) -> Vec<u8> {
    format!(
        "{id}|{kind}|{amount}|{currency}|{recipient}|{created_at}",
        kind = kind.as_str(),
        recipient = recipient.canonical(),
    )
    .into_bytes()
}

/// Aggregate of queued, not-yet-synced amounts in one currency.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyExposure {
    /// Sum of queued amounts.
    pub total: Decimal,
    /// Number of queued transactions.
    pub count: usize,
}

/// Acknowledgment returned by the remote API on successful submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAck {
    /// Server-side transaction identifier.
    pub transaction_id: String,
}
