//! Inner domain layer: the in-memory queue data structure.

pub mod queue;

pub use queue::TransactionQueue;
