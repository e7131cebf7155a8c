//! Static device-context providers.
//!
//! Real deployments wrap the platform battery and geolocation APIs behind
//! these ports; the static adapters cover tests and platforms that deny
//! the capability.

use crate::ports::outbound::{DeviceInfoProvider, LocationProvider};
use pay_types::GeoPoint;

/// Fixed device info, set once at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDeviceInfo {
    battery_level: Option<f32>,
}

impl StaticDeviceInfo {
    /// Creates a provider reporting a fixed battery level.
    #[must_use]
    pub fn with_battery(battery_level: f32) -> Self {
        Self {
            battery_level: Some(battery_level),
        }
    }
}

impl DeviceInfoProvider for StaticDeviceInfo {
    fn battery_level(&self) -> Option<f32> {
        self.battery_level
    }
}

/// Location provider for platforms without (or denying) geolocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn current_location(&self) -> Option<GeoPoint> {
        None
    }
}

/// Fixed location, for tests and previews.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub GeoPoint);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Option<GeoPoint> {
        Some(self.0)
    }
}
