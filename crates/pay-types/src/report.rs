//! Aggregate result of one drain pass.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened to a single record during a drain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordResult {
    /// Remote API acknowledged the submission.
    Delivered { remote_id: String },
    /// Submission failed under the retry ceiling; the record stays queued.
    Retrying { retry_count: u32 },
    /// Record was removed: retry ceiling hit or signature invalid.
    Evicted { reason: String },
}

/// Per-record drain outcome, kept for audit logging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub id: Uuid,
    pub result: RecordResult,
}

/// Aggregate counts for one complete drain pass.
///
/// A drain that never ran (offline, or another drain in progress) is
/// reported as the empty default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Records acknowledged by the remote API.
    pub successful: usize,
    /// Records evicted this pass (ceiling hit or signature invalid).
    pub failed: usize,
    /// Records processed this pass, including ones left queued for retry.
    pub total: usize,
    /// Per-record outcomes in processing order.
    pub outcomes: Vec<RecordOutcome>,
}

impl SyncReport {
    /// Records a successful delivery.
    pub fn record_delivered(&mut self, id: Uuid, remote_id: String) {
        self.successful += 1;
        self.total += 1;
        self.outcomes.push(RecordOutcome {
            id,
            result: RecordResult::Delivered { remote_id },
        });
    }

    /// Records a failure that leaves the record queued.
    pub fn record_retrying(&mut self, id: Uuid, retry_count: u32) {
        self.total += 1;
        self.outcomes.push(RecordOutcome {
            id,
            result: RecordResult::Retrying { retry_count },
        });
    }

    /// Records a terminal eviction.
    pub fn record_evicted(&mut self, id: Uuid, reason: String) {
        self.failed += 1;
        self.total += 1;
        self.outcomes.push(RecordOutcome {
            id,
            result: RecordResult::Evicted { reason },
        });
    }
}
