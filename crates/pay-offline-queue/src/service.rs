//! # Offline Queue Service - Facade and Sync Engine
//!
//! One instance owns the in-memory queue, its persisted mirror, and the
//! background tasks (drain worker, periodic safety net, connectivity
//! listener). Constructed once at application startup and shared by
//! `Arc`; tests build as many isolated instances as they need.
//!
//! ## Drain Triggers
//!
//! 1. After a successful `enqueue`, if online
//! 2. On an offline-to-online connectivity transition
//! 3. On the periodic timer (online, queue non-empty, no drain running)
//! 4. On explicit `trigger_sync`
//!
//! All four paths funnel through one `Notify`-driven worker, and
//! `sync_in_progress` guarantees a single drain at a time.

use crate::domain::TransactionQueue;
use crate::ports::inbound::OfflineQueueApi;
use crate::ports::outbound::{
    ConnectivityMonitor, DeviceInfoProvider, LocationProvider, QueueStore, RemoteTransactionApi,
    TimeSource, TransactionSigner,
};
use async_trait::async_trait;
use pay_bus::{EventPublisher, InMemoryEventBus, QueueEvent};
use pay_types::{
    canonical_payload, CurrencyExposure, LimitViolation, NewTransaction, QueueConfig, QueueError,
    QueuedTransaction, SignedEnvelope, SyncReport, TransactionKind, TransactionStatus, TxMetadata,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, Notify};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Clears the drain guard on drop, including when the owning
/// `trigger_sync` future is dropped mid-drain.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Injected capabilities for one service instance.
pub struct QueuePorts {
    pub store: Arc<dyn QueueStore>,
    pub remote: Arc<dyn RemoteTransactionApi>,
    pub connectivity: Arc<dyn ConnectivityMonitor>,
    pub signer: Arc<dyn TransactionSigner>,
    pub device_info: Arc<dyn DeviceInfoProvider>,
    pub location: Arc<dyn LocationProvider>,
    pub time: Arc<dyn TimeSource>,
    pub bus: Arc<InMemoryEventBus>,
}

/// The offline transaction queue: public facade plus sync engine.
pub struct OfflineQueueService {
    config: QueueConfig,
    queue: Mutex<TransactionQueue>,
    store: Arc<dyn QueueStore>,
    remote: Arc<dyn RemoteTransactionApi>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    signer: Arc<dyn TransactionSigner>,
    device_info: Arc<dyn DeviceInfoProvider>,
    location: Arc<dyn LocationProvider>,
    time: Arc<dyn TimeSource>,
    bus: Arc<InMemoryEventBus>,

    /// Sole concurrency guard for drains.
    sync_in_progress: AtomicBool,
    /// Wakes the drain worker; permits coalesce.
    drain_signal: Notify,
    /// Signals background tasks to stop.
    shutdown_tx: watch::Sender<bool>,
}

impl OfflineQueueService {
    /// Builds a service, restoring any pending records from the store.
    ///
    /// A store that fails to load starts the queue empty; the failure is
    /// logged, not fatal.
    #[must_use]
    pub fn new(config: QueueConfig, ports: QueuePorts) -> Self {
        let mut queue = TransactionQueue::new(config.max_queue_size);
        match ports.store.load() {
            Ok(records) => {
                for tx in records {
                    if let Err(e) = queue.insert(tx) {
                        warn!(error = %e, "Dropped persisted record on restore");
                    }
                }
                info!(restored = queue.len(), "Offline queue restored");
            }
            Err(e) => {
                warn!(error = %e, "Queue restore failed, starting empty");
            }
        }

        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config,
            queue: Mutex::new(queue),
            store: ports.store,
            remote: ports.remote,
            connectivity: ports.connectivity,
            signer: ports.signer,
            device_info: ports.device_info,
            location: ports.location,
            time: ports.time,
            bus: ports.bus,
            sync_in_progress: AtomicBool::new(false),
            drain_signal: Notify::new(),
            shutdown_tx,
        }
    }

    /// Starts the background tasks: drain worker, periodic safety-net
    /// timer, and connectivity listener.
    pub fn start(self: &Arc<Self>) {
        self.spawn_drain_worker();
        self.spawn_periodic_timer();
        self.spawn_connectivity_listener();
        info!("Offline queue service started");
    }

    /// Stops all background tasks deterministically.
    pub fn shutdown(&self) {
        if self.shutdown_tx.send(true).is_err() {
            debug!("Shutdown signal had no listeners");
        }
        info!("Offline queue service shut down");
    }

    /// Event bus for consumers to subscribe to.
    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    /// The fixed operating limits of this instance.
    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    fn spawn_drain_worker(self: &Arc<Self>) {
        let svc = Arc::clone(self);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = svc.drain_signal.notified() => {
                        if let Err(e) = svc.trigger_sync().await {
                            warn!(error = %e, "Scheduled drain failed");
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        debug!("Drain worker stopped");
                        break;
                    }
                }
            }
        });
    }

    fn spawn_periodic_timer(self: &Arc<Self>) {
        let svc = Arc::clone(self);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let period = self.config.periodic_sync_interval;
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let wanted = svc.connectivity.is_online()
                            && !svc.queue.lock().await.is_empty()
                            && !svc.sync_in_progress.load(Ordering::SeqCst);
                        if wanted {
                            debug!("Periodic safety-net drain scheduled");
                            svc.drain_signal.notify_one();
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        debug!("Periodic timer stopped");
                        break;
                    }
                }
            }
        });
    }

    fn spawn_connectivity_listener(self: &Arc<Self>) {
        let svc = Arc::clone(self);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut rx = self.connectivity.subscribe();
        tokio::spawn(async move {
            let mut was_online = *rx.borrow_and_update();
            loop {
                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            debug!("Connectivity monitor dropped");
                            break;
                        }
                        let online = *rx.borrow_and_update();
                        let network = svc.connectivity.network_type();
                        svc.bus
                            .publish(QueueEvent::ConnectivityChanged { online, network })
                            .await;
                        if online && !was_online {
                            info!("Connectivity restored, scheduling drain");
                            svc.drain_signal.notify_one();
                        }
                        was_online = online;
                    }
                    _ = shutdown_rx.changed() => {
                        debug!("Connectivity listener stopped");
                        break;
                    }
                }
            }
        });
    }

    /// Best-effort persistence of the current queue snapshot.
    fn persist(&self, snapshot: &[QueuedTransaction]) {
        if let Err(e) = self.store.save_all(snapshot) {
            warn!(error = %e, "Queue persistence failed");
        }
    }

    /// One complete drain pass. Caller holds the `sync_in_progress` guard.
    async fn run_drain(&self) -> SyncReport {
        let snapshot = self.queue.lock().await.snapshot_ordered();
        info!(pending = snapshot.len(), "Drain started");
        self.bus
            .publish(QueueEvent::SyncStarted {
                pending: snapshot.len(),
            })
            .await;

        let mut report = SyncReport::default();
        let total = snapshot.len();
        for (index, record) in snapshot.into_iter().enumerate() {
            // The record may have been cancelled since the snapshot was
            // taken; skip it rather than submitting a cancelled intent.
            let current = {
                let mut queue = self.queue.lock().await;
                match queue.get_mut(&record.id) {
                    Some(tx) => {
                        tx.status = TransactionStatus::Syncing;
                        Some(tx.clone())
                    }
                    None => None,
                }
            };
            let Some(tx) = current else {
                debug!(id = %record.id, "Record left the queue before submission, skipping");
                continue;
            };

            self.process_record(tx, &mut report).await;

            // Fixed throttle between submissions; deliberate backpressure
            // against the remote API, not an incidental pause
            if index + 1 < total {
                tokio::time::sleep(self.config.inter_item_delay).await;
            }
        }

        let snapshot = self.queue.lock().await.snapshot_ordered();
        self.persist(&snapshot);

        info!(
            successful = report.successful,
            failed = report.failed,
            total = report.total,
            "Drain completed"
        );
        self.bus
            .publish(QueueEvent::SyncCompleted(report.clone()))
            .await;
        report
    }

    /// Submits one record; updates queue, report, and events. Never
    /// returns an error: per-record failures must not abort the drain.
    async fn process_record(&self, mut tx: QueuedTransaction, report: &mut SyncReport) {
        // The signature must validate before every submission; a mismatch
        // is unrecoverable for this record
        if !self
            .signer
            .verify(&tx.envelope.payload, &tx.envelope.signature)
        {
            self.queue.lock().await.remove(&tx.id);
            let reason = QueueError::SignatureInvalid { id: tx.id }.to_string();
            warn!(id = %tx.id, "Signature check failed, evicting");
            report.record_evicted(tx.id, reason.clone());
            tx.status = TransactionStatus::Failed;
            self.bus
                .publish(QueueEvent::Failed {
                    transaction: tx,
                    reason,
                })
                .await;
            return;
        }

        let result = match tx.kind {
            TransactionKind::Payment => self.remote.create_payment(&tx).await,
            TransactionKind::MoneyRequest => self.remote.create_money_request(&tx).await,
            TransactionKind::Transfer => self.remote.create_transfer(&tx).await,
        };

        match result {
            Ok(ack) => {
                self.queue.lock().await.remove(&tx.id);
                info!(
                    id = %tx.id,
                    remote_id = %ack.transaction_id,
                    retries = tx.retry_count,
                    "Transaction synced"
                );
                report.record_delivered(tx.id, ack.transaction_id.clone());
                tx.status = TransactionStatus::Completed;
                self.bus
                    .publish(QueueEvent::Synced {
                        transaction: tx,
                        remote_id: ack.transaction_id,
                    })
                    .await;
            }
            Err(err) => {
                let retry_count = tx.retry_count + 1;
                if err.is_retryable() && retry_count < self.config.max_retries {
                    {
                        let mut queue = self.queue.lock().await;
                        if let Some(stored) = queue.get_mut(&tx.id) {
                            stored.retry_count = retry_count;
                            stored.status = TransactionStatus::Pending;
                        }
                    }
                    warn!(
                        id = %tx.id,
                        retry_count,
                        error = %err,
                        "Submission failed, left queued for retry"
                    );
                    report.record_retrying(tx.id, retry_count);
                } else {
                    self.queue.lock().await.remove(&tx.id);
                    error!(
                        id = %tx.id,
                        retries = retry_count,
                        error = %err,
                        "Retry ceiling reached, evicting"
                    );
                    let reason = err.to_string();
                    report.record_evicted(tx.id, reason.clone());
                    tx.retry_count = retry_count;
                    tx.status = TransactionStatus::Failed;
                    self.bus
                        .publish(QueueEvent::Failed {
                            transaction: tx,
                            reason,
                        })
                        .await;
                }
            }
        }
    }
}

#[async_trait]
impl OfflineQueueApi for OfflineQueueService {
    async fn enqueue(&self, request: NewTransaction) -> Result<QueuedTransaction, QueueError> {
        if request.amount <= Decimal::ZERO {
            return Err(QueueError::InvalidAmount {
                amount: request.amount,
            });
        }
        if request.amount > self.config.max_offline_amount {
            return Err(QueueError::LimitExceeded(LimitViolation::AmountCeiling {
                amount: request.amount,
                maximum: self.config.max_offline_amount,
            }));
        }
        // Fast capacity check before the auth prompt; the authoritative
        // check happens under the queue lock at insert
        {
            let queue = self.queue.lock().await;
            if queue.len() >= self.config.max_queue_size {
                return Err(QueueError::LimitExceeded(LimitViolation::QueueCapacity {
                    capacity: self.config.max_queue_size,
                }));
            }
        }

        let id = Uuid::new_v4();
        let created_at = self.time.now();
        let device_id = match self.store.device_id() {
            Ok(device_id) => device_id,
            Err(e) => {
                warn!(error = %e, "Device id unavailable, using transient id");
                Uuid::new_v4()
            }
        };
        let metadata = TxMetadata {
            created_at,
            device_id,
            location: self.location.current_location(),
            network: self.connectivity.network_type(),
            battery_level: self.device_info.battery_level(),
        };

        // Sign before anything is persisted; an auth failure leaves no trace
        let payload = canonical_payload(
            id,
            request.kind,
            request.amount,
            &request.currency,
            &request.recipient,
            created_at,
        );
        let signature = self.signer.sign(&payload).await?;

        let tx = QueuedTransaction {
            id,
            kind: request.kind,
            amount: request.amount,
            currency: request.currency,
            recipient: request.recipient,
            description: request.description,
            metadata,
            status: TransactionStatus::Pending,
            retry_count: 0,
            envelope: SignedEnvelope { payload, signature },
        };

        let snapshot = {
            let mut queue = self.queue.lock().await;
            queue.insert(tx.clone())?;
            queue.snapshot_ordered()
        };
        self.persist(&snapshot);

        info!(
            id = %tx.id,
            kind = ?tx.kind,
            amount = %tx.amount,
            currency = %tx.currency,
            "Offline transaction queued"
        );
        self.bus.publish(QueueEvent::Created(tx.clone())).await;

        if self.connectivity.is_online() {
            self.drain_signal.notify_one();
        }
        Ok(tx)
    }

    async fn cancel(&self, id: Uuid) -> bool {
        let removed = {
            let mut queue = self.queue.lock().await;
            queue.remove(&id)
        };
        match removed {
            Some(tx) => {
                if tx.is_syncing() {
                    // The in-flight network call cannot be aborted; it
                    // completes as if uncancelled
                    warn!(id = %id, "Cancelled while mid-submission");
                }
                let snapshot = self.queue.lock().await.snapshot_ordered();
                self.persist(&snapshot);
                info!(id = %id, "Transaction cancelled");
                self.bus.publish(QueueEvent::Cancelled { id }).await;
                true
            }
            None => false,
        }
    }

    async fn list(&self) -> Vec<QueuedTransaction> {
        self.queue.lock().await.snapshot_ordered()
    }

    async fn balance_by_currency(&self) -> BTreeMap<String, CurrencyExposure> {
        self.queue.lock().await.balance_by_currency()
    }

    async fn trigger_sync(&self) -> Result<SyncReport, QueueError> {
        if !self.connectivity.is_online() {
            debug!("Sync requested while offline, skipping");
            return Ok(SyncReport::default());
        }
        // Single drain at a time; a concurrent request is a no-op whose
        // caller should await the in-flight drain's SyncCompleted event
        if self
            .sync_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Drain already in progress, skipping");
            return Ok(SyncReport::default());
        }

        let _guard = DrainGuard(&self.sync_in_progress);
        Ok(self.run_drain().await)
    }

    async fn pending_count(&self) -> usize {
        self.queue.lock().await.len()
    }

    async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }
}
