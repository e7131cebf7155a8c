//! Watch-channel connectivity monitor.
//!
//! The platform networking glue owns one `WatchConnectivity` and calls
//! `set_status` on every platform callback; the engine holds it behind
//! the `ConnectivityMonitor` port and reacts to transitions.

use crate::ports::outbound::ConnectivityMonitor;
use pay_types::NetworkType;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::debug;

/// Connectivity state backed by a `tokio::sync::watch` pair.
pub struct WatchConnectivity {
    online_tx: watch::Sender<bool>,
    network: Mutex<NetworkType>,
}

impl WatchConnectivity {
    /// Creates a monitor with an initial state.
    #[must_use]
    pub fn new(online: bool, network: NetworkType) -> Self {
        let (online_tx, _) = watch::channel(online);
        Self {
            online_tx,
            network: Mutex::new(network),
        }
    }

    /// Starts offline with no known transport.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(false, NetworkType::Offline)
    }

    /// Reports a platform connectivity change.
    ///
    /// Subscribers see the transition even when only the transport
    /// changed, since `send` always notifies.
    pub fn set_status(&self, online: bool, network: NetworkType) {
        if let Ok(mut current) = self.network.lock() {
            *current = network;
        }
        debug!(online, network = ?network, "Connectivity status updated");
        // send only fails with no receivers; the predicate must still
        // reflect the latest state for is_online()
        self.online_tx.send_replace(online);
    }
}

impl ConnectivityMonitor for WatchConnectivity {
    fn is_online(&self) -> bool {
        *self.online_tx.borrow()
    }

    fn network_type(&self) -> NetworkType {
        self.network
            .lock()
            .map(|n| *n)
            .unwrap_or(NetworkType::Unknown)
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.online_tx.subscribe()
    }
}
