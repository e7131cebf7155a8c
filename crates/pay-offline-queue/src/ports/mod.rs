//! Ports for the offline queue subsystem.
//!
//! - `inbound`: the driving API exposed to UI and state layers.
//! - `outbound`: capability traits for everything the engine depends on
//!   (remote API, durable store, connectivity, signing, device context).

pub mod inbound;
pub mod outbound;

pub use inbound::OfflineQueueApi;
pub use outbound::{
    AuthChallenge, ConnectivityMonitor, DeviceInfoProvider, LocationProvider,
    QueueStore, RemoteTransactionApi, SystemTimeSource, TimeSource, TransactionSigner,
};
