//! Cross-crate integration tests for the offline transaction queue.

pub mod events;
pub mod recovery;

pub mod support {
    //! Shared fixtures: a fully-wired service over in-memory or
    //! file-backed adapters, with every injected port kept reachable
    //! for scripting and inspection.

    use std::path::Path;
    use std::sync::Arc;

    use pay_bus::InMemoryEventBus;
    use pay_offline_queue::adapters::{
        AlwaysConfirm, FileQueueStore, HmacSigner, MemoryQueueStore, NoLocation, StaticDeviceInfo,
        WatchConnectivity,
    };
    use pay_offline_queue::ports::outbound::{
        ConnectivityMonitor, QueueStore, RemoteTransactionApi, TimeSource, TransactionSigner,
    };
    use pay_offline_queue::test_utils::{ManualTime, MockRemoteApi};
    use pay_offline_queue::{OfflineQueueService, QueuePorts};
    use pay_types::{NetworkType, QueueConfig, QueueError};

    pub const TEST_SIGNING_KEY: &[u8] = b"paystream-test-key";

    /// Installs a test-writer subscriber once; honors `RUST_LOG`.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    pub struct Harness {
        pub service: Arc<OfflineQueueService>,
        pub remote: Arc<MockRemoteApi>,
        pub connectivity: Arc<WatchConnectivity>,
        pub store: Arc<MemoryQueueStore>,
        pub time: Arc<ManualTime>,
        pub bus: Arc<InMemoryEventBus>,
        pub signer: Arc<HmacSigner>,
    }

    /// Service over an in-memory store with testing limits
    /// (capacity 4, amount ceiling 100, retry ceiling 3).
    pub fn harness(online: bool) -> Harness {
        harness_with_store(Arc::new(MemoryQueueStore::new()), online)
    }

    /// Same wiring over a pre-seeded store, for restore-path tests.
    pub fn harness_with_store(store: Arc<MemoryQueueStore>, online: bool) -> Harness {
        init_tracing();
        let remote = Arc::new(MockRemoteApi::new());
        let connectivity = Arc::new(WatchConnectivity::new(online, NetworkType::Wifi));
        let time = Arc::new(ManualTime::new(1_000));
        let bus = Arc::new(InMemoryEventBus::new());
        let signer = Arc::new(HmacSigner::new(
            TEST_SIGNING_KEY.to_vec(),
            Arc::new(AlwaysConfirm),
        ));
        let service = Arc::new(OfflineQueueService::new(
            QueueConfig::for_testing(),
            QueuePorts {
                store: Arc::clone(&store) as Arc<dyn QueueStore>,
                remote: Arc::clone(&remote) as Arc<dyn RemoteTransactionApi>,
                connectivity: Arc::clone(&connectivity) as Arc<dyn ConnectivityMonitor>,
                signer: Arc::clone(&signer) as Arc<dyn TransactionSigner>,
                device_info: Arc::new(StaticDeviceInfo::with_battery(0.8)),
                location: Arc::new(NoLocation),
                time: Arc::clone(&time) as Arc<dyn TimeSource>,
                bus: Arc::clone(&bus),
            },
        ));
        Harness {
            service,
            remote,
            connectivity,
            store,
            time,
            bus,
            signer,
        }
    }

    /// Service over a file store rooted at `dir`; used by restart tests
    /// that build two services over the same directory.
    pub fn file_backed_service(
        dir: &Path,
        online: bool,
        remote: Arc<MockRemoteApi>,
    ) -> Result<Arc<OfflineQueueService>, QueueError> {
        init_tracing();
        let store = Arc::new(FileQueueStore::new(dir)?);
        let connectivity = Arc::new(WatchConnectivity::new(online, NetworkType::Wifi));
        let signer = Arc::new(HmacSigner::new(
            TEST_SIGNING_KEY.to_vec(),
            Arc::new(AlwaysConfirm),
        ));
        Ok(Arc::new(OfflineQueueService::new(
            QueueConfig::for_testing(),
            QueuePorts {
                store,
                remote: remote as Arc<dyn RemoteTransactionApi>,
                connectivity: connectivity as Arc<dyn ConnectivityMonitor>,
                signer: signer as Arc<dyn TransactionSigner>,
                device_info: Arc::new(StaticDeviceInfo::with_battery(0.8)),
                location: Arc::new(NoLocation),
                time: Arc::new(ManualTime::new(1_000)) as Arc<dyn TimeSource>,
                bus: Arc::new(InMemoryEventBus::new()),
            },
        )))
    }
}
