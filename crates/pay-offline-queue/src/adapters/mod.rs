//! Outer-layer adapters implementing the outbound ports.

pub mod connectivity;
pub mod device;
pub mod signer;
pub mod store;

pub use connectivity::WatchConnectivity;
pub use device::{FixedLocation, NoLocation, StaticDeviceInfo};
pub use signer::{AlwaysConfirm, DenyAll, HmacSigner};
pub use store::{FileQueueStore, MemoryQueueStore};
