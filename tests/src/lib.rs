//! # PayStream Test Suite
//!
//! Unified integration crate exercising the offline queue end to end:
//! enqueue limits, drain ordering and retries, durable recovery across
//! restarts, and event choreography over the pay-bus.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs      # Enqueue-to-drain choreography
//!     ├── recovery.rs   # Persistence and restart behavior
//!     └── events.rs     # Event emission over the bus
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pay-tests
//! cargo test -p pay-tests integration::flows::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
