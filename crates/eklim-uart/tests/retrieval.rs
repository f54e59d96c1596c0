//! Bulk retrieval against the mock channel

use std::sync::Arc;
use std::time::Duration;

use eklim_uart::channel::mock::MockChannel;
use eklim_uart::{
    FaultError, FaultRetriever, MockConfig, RetrievalConfig, RetrievalOutcome, RetrievalSummary,
    SessionState,
};
use pretty_assertions::assert_eq;

const OUTPUT_1: &str = "0125061510300050002250";
const INPUT_2: &str = "0A25061510300050002250";
const UNKNOWN_40: &str = "2825061510300050002250";

fn setup(bodies: &[&str]) -> (Arc<MockChannel>, Arc<FaultRetriever>) {
    let channel = Arc::new(MockChannel::with_fault_log(
        &MockConfig::default(),
        bodies.iter().copied(),
    ));
    let retriever = Arc::new(FaultRetriever::new(
        channel.clone(),
        RetrievalConfig::default(),
    ));
    (channel, retriever)
}

fn record_indices(retriever: &FaultRetriever) -> Vec<u32> {
    retriever
        .records()
        .iter()
        .filter_map(|r| r.record_index())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_full_session_descending_order() {
    let (channel, retriever) = setup(&[OUTPUT_1, INPUT_2, UNKNOWN_40]);

    let outcome = retriever.start().await.unwrap();

    assert_eq!(
        outcome,
        RetrievalOutcome::Completed(RetrievalSummary {
            success_count: 3,
            fail_count: 0,
            total: 3,
            failed_indices: vec![],
        })
    );
    assert_eq!(retriever.state(), SessionState::Completed);
    assert_eq!(record_indices(&retriever), vec![3, 2, 1]);
    assert_eq!(
        channel.sent_commands(),
        vec!["AN", "00003v", "00002v", "00001v"]
    );

    let labels: Vec<String> = retriever
        .records()
        .iter()
        .map(|r| r.pin_label().to_string())
        .collect();
    assert_eq!(labels, vec!["Pin 40", "Giriş 2", "Çıkış 1"]);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_counts_as_failure() {
    let (channel, retriever) = setup(&[OUTPUT_1, INPUT_2, OUTPUT_1]);
    channel.timeout_command("00002v");

    let outcome = retriever.start().await.unwrap();
    let summary = outcome.summary().unwrap();

    assert_eq!(summary.success_count, 2);
    assert_eq!(summary.fail_count, 1);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.failed_indices, vec![2]);
    assert!(summary.is_partial());
    assert_eq!(record_indices(&retriever), vec![3, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_mixed_failures_do_not_abort() {
    let (channel, retriever) = setup(&[OUTPUT_1, OUTPUT_1, OUTPUT_1, OUTPUT_1]);
    channel.set_response("00004v", "E");
    channel.fail_command("00003v", "UART busy");
    channel.set_response("00002v", "2:0125139910300050002250");

    let outcome = retriever.start().await.unwrap();
    let summary = outcome.summary().unwrap();

    assert_eq!(summary.success_count, 1);
    assert_eq!(summary.fail_count, 3);
    assert_eq!(summary.success_count + summary.fail_count, summary.total);
    assert_eq!(summary.failed_indices, vec![4, 3, 2]);
    assert_eq!(record_indices(&retriever), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_no_records() {
    let channel = Arc::new(MockChannel::new(&MockConfig::default()));
    channel.set_response("AN", "A00001");
    let retriever = FaultRetriever::new(channel.clone(), RetrievalConfig::default());

    let outcome = retriever.start().await.unwrap();

    assert_eq!(outcome, RetrievalOutcome::NoRecords);
    assert_eq!(retriever.state(), SessionState::NoRecords);
    assert!(retriever.records().is_empty());
    assert_eq!(channel.sent_commands(), vec!["AN"]);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_count_is_no_records() {
    let channel = Arc::new(MockChannel::new(&MockConfig::default()));
    channel.set_connected(false);
    let retriever = FaultRetriever::new(channel, RetrievalConfig::default());

    assert_eq!(retriever.start().await.unwrap(), RetrievalOutcome::NoRecords);
}

#[tokio::test(start_paused = true)]
async fn test_pacing_between_requests() {
    let (_channel, retriever) = setup(&[OUTPUT_1, OUTPUT_1, OUTPUT_1]);

    let started = tokio::time::Instant::now();
    retriever.start().await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_one_request_in_flight() {
    let channel = Arc::new(MockChannel::with_fault_log(
        &MockConfig { latency_ms: 40 },
        [OUTPUT_1; 6],
    ));
    let retriever = FaultRetriever::new(channel.clone(), RetrievalConfig::default());

    retriever.start().await.unwrap();

    assert_eq!(channel.max_in_flight(), 1);
    assert_eq!(channel.sent_commands().len(), 7);
}

#[tokio::test(start_paused = true)]
async fn test_reentrant_operations_are_busy() {
    let (_channel, retriever) = setup(&[OUTPUT_1, OUTPUT_1, OUTPUT_1]);

    let session = {
        let retriever = retriever.clone();
        tokio::spawn(async move { retriever.start().await })
    };
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(retriever.state(), SessionState::Fetching);
    assert!(matches!(retriever.start().await, Err(FaultError::SessionBusy)));
    assert!(matches!(retriever.clear(), Err(FaultError::SessionBusy)));
    assert!(matches!(
        retriever.fetch_record(1).await,
        Err(FaultError::SessionBusy)
    ));
    assert!(matches!(
        retriever.query_count().await,
        Err(FaultError::SessionBusy)
    ));

    let outcome = session.await.unwrap().unwrap();
    assert!(outcome.summary().unwrap().is_full_success());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_keeps_fetched_records() {
    let (channel, retriever) = setup(&[OUTPUT_1; 5]);

    let session = {
        let retriever = retriever.clone();
        tokio::spawn(async move { retriever.start().await })
    };
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(retriever.cancel());

    let outcome = session.await.unwrap().unwrap();

    assert_eq!(
        outcome,
        RetrievalOutcome::Cancelled(RetrievalSummary {
            success_count: 2,
            fail_count: 0,
            total: 5,
            failed_indices: vec![],
        })
    );
    assert_eq!(retriever.state(), SessionState::Cancelled);
    assert_eq!(record_indices(&retriever), vec![5, 4]);
    assert_eq!(channel.sent_commands(), vec!["AN", "00005v", "00004v"]);
    assert!(!retriever.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_restart_replaces_records() {
    let (channel, retriever) = setup(&[OUTPUT_1, OUTPUT_1]);
    retriever.start().await.unwrap();
    assert_eq!(retriever.records().len(), 2);

    channel.set_response("AN", "A00002");
    retriever.start().await.unwrap();
    assert_eq!(record_indices(&retriever), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_count_clamped_to_max_index() {
    let channel = Arc::new(MockChannel::with_fault_log(
        &MockConfig::default(),
        [OUTPUT_1; 3],
    ));
    channel.set_response("AN", "A00010");
    let config = RetrievalConfig {
        max_record_index: 3,
        ..Default::default()
    };
    let retriever = FaultRetriever::new(channel.clone(), config);

    let outcome = retriever.start().await.unwrap();

    assert_eq!(outcome.summary().unwrap().total, 3);
    assert_eq!(
        channel.sent_commands(),
        vec!["AN", "00003v", "00002v", "00001v"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_progress_updates() {
    let (_channel, retriever) = setup(&[OUTPUT_1, OUTPUT_1]);
    let progress = retriever.subscribe_progress();

    retriever.start().await.unwrap();

    let last = progress.borrow().clone();
    assert_eq!(last.state, SessionState::Completed);
    assert_eq!(last.attempted, 2);
    assert_eq!(last.total, 2);
    assert_eq!(last.percent(), 100);
    assert_eq!(last.fraction(), 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_single_record_fetch() {
    let (_channel, retriever) = setup(&[OUTPUT_1, INPUT_2]);

    let record = retriever.fetch_record(2).await.unwrap();
    assert_eq!(record.record_index(), Some(2));
    assert_eq!(record.pin_label(), "Giriş 2");

    let err = retriever.fetch_record(3).await.unwrap_err();
    assert!(matches!(err, FaultError::Channel(_)));
}
