//! End-to-end runs of the acceptance scenario against the mock services.
//!
//! Covers the passing path and the verification failures (wrong status,
//! stock not deducted). Abort and cleanup behavior lives in
//! `failure_paths.rs`.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use order_flow_cli::{AcceptanceError, AcceptanceRun, CleanupAction, RunId, runner};
use order_flow_core::OrderStatus;
use order_flow_integration_tests::{Behavior, MockServices, init_tracing};
use reqwest::StatusCode;

// ============================================================================
// Passing run
// ============================================================================

#[tokio::test]
async fn test_full_run_confirms_order_and_deducts_stock() {
    init_tracing();
    let services = MockServices::start().await;

    let run = AcceptanceRun::new(&services.config(), RunId::new(4321)).unwrap();
    let outcome = run.execute().await;

    let report = outcome.result.unwrap();
    assert_eq!(report.run_id, RunId::new(4321));
    assert_eq!(report.order_status, OrderStatus::Confirmed);
    assert_eq!(report.final_stock, 48);

    assert_eq!(
        outcome.cleanup.product,
        CleanupAction::Deleted(StatusCode::NO_CONTENT)
    );
    assert_eq!(
        outcome.cleanup.customer,
        CleanupAction::Deleted(StatusCode::NO_CONTENT)
    );
    assert_eq!(services.customer_count().await, 0);
    assert_eq!(services.product_count().await, 0);
    assert_eq!(services.order_count().await, 1);
}

#[tokio::test]
async fn test_requests_follow_fixed_sequence() {
    init_tracing();
    let services = MockServices::start().await;

    let report = runner::run(&services.config()).await.unwrap();
    let customer = report.customer_id;
    let product = report.product_id;
    let order = report.order_id;

    assert_eq!(
        services.requests().await,
        vec![
            "POST /customers/".to_owned(),
            "POST /products/".to_owned(),
            "POST /orders/".to_owned(),
            format!("GET /orders/{order}"),
            format!("GET /products/{product}"),
            format!("DELETE /products/{product}"),
            format!("DELETE /customers/{customer}"),
        ]
    );
}

#[tokio::test]
async fn test_settle_delay_covers_async_confirmation() {
    init_tracing();
    let services = MockServices::start_with(Behavior {
        settle_time: Duration::from_millis(100),
        ..Behavior::default()
    })
    .await;

    let config = services.config().with_settle_delay(Duration::from_millis(400));
    let report = runner::run(&config).await.unwrap();
    assert_eq!(report.order_status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_back_to_back_runs_do_not_collide() {
    init_tracing();
    let services = MockServices::start().await;

    // The mock rejects duplicate emails with 409, so a reused run id would fail
    // the second run if the first one had not cleaned up.
    for run_id in [1111, 2222, 2222] {
        let run = AcceptanceRun::new(&services.config(), RunId::new(run_id)).unwrap();
        let outcome = run.execute().await;
        assert!(outcome.result.is_ok(), "run {run_id}: {:?}", outcome.result);
        assert!(outcome.cleanup.is_clean());
    }
    assert_eq!(services.order_count().await, 3);
}

// ============================================================================
// Verification failures
// ============================================================================

#[tokio::test]
async fn test_order_not_confirmed_fails_run() {
    init_tracing();
    let services = MockServices::start_with(Behavior {
        settle_time: Duration::from_secs(60),
        ..Behavior::default()
    })
    .await;

    let outcome = AcceptanceRun::new(&services.config(), RunId::random())
        .unwrap()
        .execute()
        .await;

    let err = outcome.result.unwrap_err();
    assert!(matches!(
        &err,
        AcceptanceError::StatusMismatch {
            expected: OrderStatus::Confirmed,
            actual: OrderStatus::Pending,
        }
    ));
    assert_eq!(
        err.to_string(),
        "Order status verification failed. Expected 'confirmed', got 'pending'."
    );
    assert!(outcome.cleanup.is_clean());
    assert_eq!(services.product_count().await, 0);
    assert_eq!(services.customer_count().await, 0);
}

#[tokio::test]
async fn test_unexpected_order_status_reported_verbatim() {
    init_tracing();
    let services = MockServices::start_with(Behavior {
        settled_status: OrderStatus::Other("payment_failed".to_owned()),
        ..Behavior::default()
    })
    .await;

    let err = runner::run(&services.config()).await.unwrap_err();
    assert!(err.to_string().contains("got 'payment_failed'"));
}

#[tokio::test]
async fn test_stock_not_deducted_fails_run() {
    init_tracing();
    let services = MockServices::start_with(Behavior {
        deduct_stock: false,
        ..Behavior::default()
    })
    .await;

    let outcome = AcceptanceRun::new(&services.config(), RunId::random())
        .unwrap()
        .execute()
        .await;

    assert!(matches!(
        outcome.result,
        Err(AcceptanceError::StockMismatch {
            expected: 48,
            found: 50
        })
    ));
    assert!(outcome.cleanup.is_clean());
    assert_eq!(services.product_count().await, 0);
}
