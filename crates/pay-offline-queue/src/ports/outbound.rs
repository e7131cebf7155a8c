//! Outbound (Driven) ports for the offline queue subsystem.
//!
//! These traits define dependencies on external systems that the queue
//! needs for operation. Every platform capability is injected here so the
//! engine and the enqueue path can be tested without a real device.

use async_trait::async_trait;
use pay_types::{GeoPoint, NetworkType, QueueError, QueuedTransaction, RemoteAck, Timestamp};
use tokio::sync::watch;
use uuid::Uuid;

/// Durable storage for the queued-transaction document.
///
/// Writes are best-effort: a failure is logged by the caller, never fatal
/// to the in-memory queue. A crash between enqueue and persistence loses
/// at most the most recent in-flight write.
pub trait QueueStore: Send + Sync {
    /// Loads the persisted queue, restricted to records that should be
    /// retried: `Pending` records as-is, `Syncing` leftovers from a
    /// mid-drain crash reset to `Pending`. Safe only because the remote
    /// API deduplicates on the transaction id.
    fn load(&self) -> Result<Vec<QueuedTransaction>, QueueError>;

    /// Replaces the persisted queue document with the given snapshot.
    fn save_all(&self, queue: &[QueuedTransaction]) -> Result<(), QueueError>;

    /// Stable per-install device identifier, created on first access.
    fn device_id(&self) -> Result<Uuid, QueueError>;
}

/// Remote transaction API.
///
/// All three calls MUST be idempotent keyed on the transaction's `id`:
/// the sync engine assumes a retried call with the same id is safe and
/// will not create a duplicate financial effect.
#[async_trait]
pub trait RemoteTransactionApi: Send + Sync {
    /// Submits a payment. `tx.id` is the idempotency key.
    async fn create_payment(&self, tx: &QueuedTransaction) -> Result<RemoteAck, QueueError>;

    /// Submits a money request. `tx.id` is the idempotency key.
    async fn create_money_request(&self, tx: &QueuedTransaction) -> Result<RemoteAck, QueueError>;

    /// Submits a transfer. `tx.id` is the idempotency key.
    async fn create_transfer(&self, tx: &QueuedTransaction) -> Result<RemoteAck, QueueError>;
}

/// Connectivity predicate plus transition signal.
///
/// Push-based: the engine listens on `subscribe()` and drains on a
/// false-to-true transition. The periodic timer is the safety net for
/// missed transitions, not the primary mechanism.
pub trait ConnectivityMonitor: Send + Sync {
    /// Current online/offline predicate.
    fn is_online(&self) -> bool;

    /// Network transport, used only for metadata enrichment.
    fn network_type(&self) -> NetworkType;

    /// Watch channel carrying the online predicate; changes are the
    /// transition events.
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Local authentication challenge (biometric prompt, passcode).
///
/// Offline transactions are never created without a successful live
/// challenge.
#[async_trait]
pub trait AuthChallenge: Send + Sync {
    /// Runs the challenge.
    ///
    /// # Errors
    /// `AuthenticationFailed` if the user cannot authenticate.
    async fn confirm(&self) -> Result<(), QueueError>;
}

/// Opaque signing capability over a canonical transaction payload.
///
/// `sign` requires a successful local authentication challenge. The
/// concrete primitives are adapter details; the engine only needs
/// non-repudiation and tamper evidence while the record sits queued.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Produces a signature over the canonical payload, after a
    /// successful auth challenge.
    ///
    /// # Errors
    /// `AuthenticationFailed` if the challenge fails; nothing is signed.
    async fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, QueueError>;

    /// Verifies a signature against a payload.
    fn verify(&self, payload: &[u8], signature: &[u8]) -> bool;
}

/// Best-effort device context for metadata enrichment.
pub trait DeviceInfoProvider: Send + Sync {
    /// Battery level in `[0.0, 1.0]`, if the platform reports it.
    fn battery_level(&self) -> Option<f32>;
}

/// Best-effort approximate location for metadata enrichment.
pub trait LocationProvider: Send + Sync {
    /// Current location, if granted and available.
    fn current_location(&self) -> Option<GeoPoint>;
}

/// Time source for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}
