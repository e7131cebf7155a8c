//! # Persistence and Restart Behavior
//!
//! The in-memory queue must be reconstructible from its persisted
//! mirror: records queued before a crash survive into the next session,
//! interrupted submissions restart from `Pending`, and terminal records
//! never come back.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::integration::support::{file_backed_service, harness_with_store, TEST_SIGNING_KEY};
    use pay_offline_queue::adapters::{AlwaysConfirm, HmacSigner, MemoryQueueStore};
    use pay_offline_queue::ports::inbound::OfflineQueueApi;
    use pay_offline_queue::ports::outbound::TransactionSigner;
    use pay_offline_queue::test_utils::{payment_request, queued_record, MockRemoteApi};
    use pay_types::{RecordResult, TransactionStatus};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_queue_survives_process_restart() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(MockRemoteApi::new());

        let before = file_backed_service(dir.path(), false, Arc::clone(&remote)).unwrap();
        let first = before.enqueue(payment_request(dec!(11), "USD")).await.unwrap();
        let second = before.enqueue(payment_request(dec!(22), "USD")).await.unwrap();
        drop(before);

        // Next session over the same directory sees both records and
        // can drain them in the original order
        let after = file_backed_service(dir.path(), true, Arc::clone(&remote)).unwrap();
        let restored = after.list().await;
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].id, first.id);
        assert_eq!(restored[1].id, second.id);

        let report = after.trigger_sync().await.unwrap();
        assert_eq!(report.successful, 2);
        assert_eq!(remote.call_order(), vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_restore_resets_interrupted_submissions() {
        let mut interrupted = queued_record(dec!(5), "USD", 100);
        interrupted.status = TransactionStatus::Syncing;
        interrupted.retry_count = 1;
        let done = {
            let mut tx = queued_record(dec!(6), "USD", 200);
            tx.status = TransactionStatus::Completed;
            tx
        };
        let evicted = {
            let mut tx = queued_record(dec!(7), "USD", 300);
            tx.status = TransactionStatus::Failed;
            tx
        };

        let store = Arc::new(MemoryQueueStore::with_records(vec![
            interrupted.clone(),
            done,
            evicted,
        ]));
        let h = harness_with_store(store, false);

        let restored = h.service.list().await;
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].id, interrupted.id);
        assert_eq!(restored[0].status, TransactionStatus::Pending);
        // The interrupted attempt keeps its retry history
        assert_eq!(restored[0].retry_count, 1);
    }

    #[tokio::test]
    async fn test_tampered_record_evicted_without_remote_call() {
        // Placeholder signature from the fixture fails verification
        let tampered = queued_record(dec!(9), "USD", 100);
        let store = Arc::new(MemoryQueueStore::with_records(vec![tampered.clone()]));
        let h = harness_with_store(store, true);
        let mut sub = h
            .bus
            .subscribe(pay_bus::EventFilter::topics(vec![pay_bus::EventTopic::Sync]));

        let report = h.service.trigger_sync().await.unwrap();
        assert_eq!(report.failed, 1);
        assert!(matches!(
            report.outcomes[0].result,
            RecordResult::Evicted { .. }
        ));
        assert!(h.remote.call_order().is_empty());
        assert!(h.service.is_empty().await);

        // Eviction is a signature judgement, not a retry: the attempt
        // never counted
        loop {
            match sub.try_recv().expect("bus closed") {
                Some(pay_bus::QueueEvent::Failed { transaction, .. }) => {
                    assert_eq!(transaction.id, tampered.id);
                    assert_eq!(transaction.retry_count, 0);
                    break;
                }
                Some(_) => continue,
                None => panic!("no Failed event emitted"),
            }
        }
    }

    #[tokio::test]
    async fn test_valid_restored_signature_still_verifies() {
        // A record signed in a previous session must verify in the next
        // one given the same key
        let signer = HmacSigner::new(TEST_SIGNING_KEY.to_vec(), Arc::new(AlwaysConfirm));
        let mut tx = queued_record(dec!(4), "USD", 100);
        tx.envelope.signature = signer.sign(&tx.envelope.payload).await.unwrap();

        let store = Arc::new(MemoryQueueStore::with_records(vec![tx.clone()]));
        let h = harness_with_store(store, true);

        let report = h.service.trigger_sync().await.unwrap();
        assert_eq!(report.successful, 1);
        assert_eq!(h.remote.call_order(), vec![tx.id]);
    }

    #[tokio::test]
    async fn test_store_mirrors_every_mutation() {
        let h = crate::integration::support::harness(false);
        let first = h.service.enqueue(payment_request(dec!(1), "USD")).await.unwrap();
        let second = h.service.enqueue(payment_request(dec!(2), "USD")).await.unwrap();
        assert_eq!(h.store.raw_records().len(), 2);

        h.service.cancel(first.id).await;
        let records = h.store.raw_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, second.id);

        h.connectivity
            .set_status(true, pay_types::NetworkType::Wifi);
        h.service.trigger_sync().await.unwrap();
        assert!(h.store.raw_records().is_empty());
    }
}
