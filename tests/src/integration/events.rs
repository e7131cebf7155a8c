//! # Event Emission over the Bus
//!
//! Consumers (UI state, notification layer) observe the queue purely
//! through `QueueEvent`s. These tests subscribe before acting and assert
//! the exact sequence a consumer would see.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::integration::support::harness;
    use pay_bus::{EventFilter, EventTopic, QueueEvent, Subscription};
    use pay_offline_queue::ports::inbound::OfflineQueueApi;
    use pay_offline_queue::test_utils::payment_request;
    use pay_types::{NetworkType, TransactionStatus};
    use rust_decimal_macros::dec;
    use tokio::time::timeout;

    async fn next_event(sub: &mut Subscription) -> QueueEvent {
        timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timed out waiting for event")
            .expect("bus closed")
    }

    #[tokio::test]
    async fn test_enqueue_emits_created() {
        let h = harness(false);
        let mut sub = h.bus.subscribe(EventFilter::all());

        let tx = h.service.enqueue(payment_request(dec!(1), "USD")).await.unwrap();

        match next_event(&mut sub).await {
            QueueEvent::Created(created) => {
                assert_eq!(created.id, tx.id);
                assert_eq!(created.status, TransactionStatus::Pending);
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_emits_cancelled() {
        let h = harness(false);
        let tx = h.service.enqueue(payment_request(dec!(1), "USD")).await.unwrap();

        let mut sub = h.bus.subscribe(EventFilter::topics(vec![EventTopic::Queue]));
        h.service.cancel(tx.id).await;

        assert_eq!(
            next_event(&mut sub).await,
            QueueEvent::Cancelled { id: tx.id }
        );
    }

    #[tokio::test]
    async fn test_drain_event_sequence() {
        let h = harness(true);
        let tx = h.service.enqueue(payment_request(dec!(2), "USD")).await.unwrap();

        let mut sub = h.bus.subscribe(EventFilter::topics(vec![EventTopic::Sync]));
        h.service.trigger_sync().await.unwrap();

        assert_eq!(
            next_event(&mut sub).await,
            QueueEvent::SyncStarted { pending: 1 }
        );
        match next_event(&mut sub).await {
            QueueEvent::Synced {
                transaction,
                remote_id,
            } => {
                assert_eq!(transaction.id, tx.id);
                assert_eq!(transaction.status, TransactionStatus::Completed);
                assert!(!remote_id.is_empty());
            }
            other => panic!("expected Synced, got {other:?}"),
        }
        match next_event(&mut sub).await {
            QueueEvent::SyncCompleted(report) => {
                assert_eq!(report.successful, 1);
                assert_eq!(report.total, 1);
            }
            other => panic!("expected SyncCompleted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_final_failure_emits_failed_with_history() {
        let h = harness(true);
        let tx = h.service.enqueue(payment_request(dec!(2), "USD")).await.unwrap();
        h.remote.fail_times(tx.id, u32::MAX);

        let mut sub = h.bus.subscribe(EventFilter::topics(vec![EventTopic::Sync]));
        h.service.trigger_sync().await.unwrap();
        h.service.trigger_sync().await.unwrap();
        h.service.trigger_sync().await.unwrap();

        // The first two drains emit started/completed pairs only; the
        // third carries the terminal Failed
        loop {
            match next_event(&mut sub).await {
                QueueEvent::Failed {
                    transaction,
                    reason,
                } => {
                    assert_eq!(transaction.id, tx.id);
                    assert_eq!(transaction.status, TransactionStatus::Failed);
                    assert_eq!(transaction.retry_count, 3);
                    assert!(!reason.is_empty());
                    break;
                }
                QueueEvent::SyncStarted { .. } | QueueEvent::SyncCompleted(_) => continue,
                other => panic!("expected Failed, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_connectivity_transition_published() {
        let h = harness(false);
        h.service.start();
        let mut sub = h
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Connectivity]));

        h.connectivity.set_status(true, NetworkType::Cellular);

        assert_eq!(
            next_event(&mut sub).await,
            QueueEvent::ConnectivityChanged {
                online: true,
                network: NetworkType::Cellular,
            }
        );
        h.service.shutdown();
    }

    #[tokio::test]
    async fn test_filter_hides_other_topics() {
        let h = harness(true);
        let mut sub = h.bus.subscribe(EventFilter::topics(vec![EventTopic::Sync]));

        h.service.enqueue(payment_request(dec!(1), "USD")).await.unwrap();
        h.service.trigger_sync().await.unwrap();

        // Created is a Queue event and must not appear on a Sync-only
        // subscription
        assert_eq!(
            next_event(&mut sub).await,
            QueueEvent::SyncStarted { pending: 1 }
        );
    }
}
