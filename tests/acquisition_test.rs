// ABOUTME: Integration tests for the acquisition controller
// ABOUTME: Timeout budgets, transient classification, and the exactly-one-retry bound

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod helpers;

use std::sync::Mutex;
use std::time::Duration;

use helpers::scripted_provider::{ScanStep, ScriptedProvider};
use helpers::{camera_request, clean_raw_result};
use mealscan_core::acquisition::AcquisitionController;
use mealscan_core::config::ScanConfig;
use mealscan_core::errors::ScanError;

fn controller() -> AcquisitionController {
    AcquisitionController::new(ScanConfig::default())
}

#[tokio::test(start_paused = true)]
async fn first_attempt_success_makes_one_call() {
    let provider = ScriptedProvider::new(vec![ScanStep::Succeed(Box::new(clean_raw_result()))]);
    let notices: Mutex<Vec<String>> = Mutex::new(Vec::new());

    let outcome = controller()
        .acquire(&provider, &camera_request(), |notice| {
            notices.lock().unwrap().push(notice.to_owned());
        })
        .await;

    assert!(outcome.is_ok());
    assert_eq!(provider.scan_calls(), 1);
    assert!(notices.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn transient_failure_retries_once_and_succeeds() {
    let provider = ScriptedProvider::new(vec![
        ScanStep::Fail("network unreachable"),
        ScanStep::Succeed(Box::new(clean_raw_result())),
    ]);
    let notices: Mutex<Vec<String>> = Mutex::new(Vec::new());

    let raw = controller()
        .acquire(&provider, &camera_request(), |notice| {
            notices.lock().unwrap().push(notice.to_owned());
        })
        .await
        .unwrap();

    assert_eq!(raw.items.len(), 1);
    assert_eq!(provider.scan_calls(), 2);
    assert_eq!(
        notices.lock().unwrap().as_slice(),
        ["Connection hiccup, retrying photo analysis"]
    );
}

#[tokio::test(start_paused = true)]
async fn two_transient_failures_stop_after_second_attempt() {
    let provider = ScriptedProvider::new(vec![
        ScanStep::Fail("network timeout talking to recognition service"),
        ScanStep::Fail("connection reset by peer"),
    ]);

    let outcome = controller()
        .acquire(&provider, &camera_request(), |_| {})
        .await;

    assert!(outcome.is_err());
    // The retry bound is exactly one: two attempts total, never a third.
    assert_eq!(provider.scan_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn non_transient_failure_is_not_retried() {
    let provider = ScriptedProvider::new(vec![ScanStep::Fail("invalid image payload")]);
    let notices: Mutex<Vec<String>> = Mutex::new(Vec::new());

    let outcome = controller()
        .acquire(&provider, &camera_request(), |notice| {
            notices.lock().unwrap().push(notice.to_owned());
        })
        .await;

    assert!(matches!(outcome, Err(ScanError::Provider { .. })));
    assert_eq!(provider.scan_calls(), 1);
    assert!(notices.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_first_attempt_times_out_and_retries() {
    let provider = ScriptedProvider::new(vec![
        ScanStep::Stall(Duration::from_secs(60), Box::new(clean_raw_result())),
        ScanStep::Succeed(Box::new(clean_raw_result())),
    ]);

    let raw = controller()
        .acquire(&provider, &camera_request(), |_| {})
        .await
        .unwrap();

    assert_eq!(raw.items[0].name, "Grilled chicken");
    assert_eq!(provider.scan_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn second_timeout_surfaces_the_tighter_budget() {
    let provider = ScriptedProvider::new(vec![ScanStep::Stall(
        Duration::from_secs(120),
        Box::new(clean_raw_result()),
    )]);

    let outcome = controller()
        .acquire(&provider, &camera_request(), |_| {})
        .await;

    match outcome {
        Err(ScanError::Timeout { seconds }) => assert_eq!(seconds, 35),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(provider.scan_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn custom_timing_configuration_is_honored() {
    let config = ScanConfig {
        first_attempt_timeout: Duration::from_secs(2),
        second_attempt_timeout: Duration::from_secs(1),
        retry_backoff: Duration::from_millis(50),
    };
    let provider = ScriptedProvider::new(vec![ScanStep::Stall(
        Duration::from_secs(5),
        Box::new(clean_raw_result()),
    )]);

    let outcome = AcquisitionController::new(config)
        .acquire(&provider, &camera_request(), |_| {})
        .await;

    match outcome {
        Err(ScanError::Timeout { seconds }) => assert_eq!(seconds, 1),
        other => panic!("expected timeout, got {other:?}"),
    }
}
