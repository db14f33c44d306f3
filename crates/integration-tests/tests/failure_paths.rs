//! Failures that abort the run: rejected creations, malformed bodies, and
//! network errors. Every case checks that dependent steps were never
//! attempted and that whatever was created got deleted.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use order_flow_cli::{
    AcceptanceConfig, AcceptanceError, AcceptanceRun, CleanupAction, RunId, ServiceEndpoints,
    runner,
};
use order_flow_integration_tests::{Behavior, MockServices, init_tracing, unreachable_url};
use reqwest::StatusCode;

fn posts(requests: &[String]) -> Vec<&str> {
    requests
        .iter()
        .map(String::as_str)
        .filter(|r| r.starts_with("POST"))
        .collect()
}

// ============================================================================
// Rejected creations
// ============================================================================

#[tokio::test]
async fn test_customer_rejection_aborts_before_product_and_order() {
    init_tracing();
    let services = MockServices::start_with(Behavior {
        reject_customer: Some(StatusCode::BAD_REQUEST),
        ..Behavior::default()
    })
    .await;

    let outcome = AcceptanceRun::new(&services.config(), RunId::new(1234))
        .unwrap()
        .execute()
        .await;

    let err = outcome.result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to create customer. Status: 400 Bad Request, \
         Body: customer rejected: testuser1234@example.com"
    );

    // Nothing was created, so nothing is deleted.
    assert_eq!(services.requests().await, vec!["POST /customers/".to_owned()]);
    assert_eq!(outcome.cleanup.product, CleanupAction::Skipped);
    assert_eq!(outcome.cleanup.customer, CleanupAction::Skipped);
}

#[tokio::test]
async fn test_product_rejection_still_deletes_customer() {
    init_tracing();
    let services = MockServices::start_with(Behavior {
        reject_product: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..Behavior::default()
    })
    .await;

    let outcome = AcceptanceRun::new(&services.config(), RunId::random())
        .unwrap()
        .execute()
        .await;

    assert!(matches!(
        outcome.result,
        Err(AcceptanceError::UnexpectedStatus {
            action: "create product",
            status,
            ..
        }) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));

    let requests = services.requests().await;
    assert_eq!(posts(&requests), vec!["POST /customers/", "POST /products/"]);
    assert_eq!(outcome.cleanup.product, CleanupAction::Skipped);
    assert_eq!(
        outcome.cleanup.customer,
        CleanupAction::Deleted(StatusCode::NO_CONTENT)
    );
    assert_eq!(services.customer_count().await, 0);
}

#[tokio::test]
async fn test_order_rejection_deletes_both_fixtures() {
    init_tracing();
    let services = MockServices::start_with(Behavior {
        reject_order: Some(StatusCode::SERVICE_UNAVAILABLE),
        ..Behavior::default()
    })
    .await;

    let err = runner::run(&services.config()).await.unwrap_err();
    assert!(
        err.to_string()
            .starts_with("Failed to create order. Status: 503 Service Unavailable")
    );

    let requests = services.requests().await;
    assert!(!requests.iter().any(|r| r.starts_with("GET")));
    assert_eq!(services.customer_count().await, 0);
    assert_eq!(services.product_count().await, 0);
    assert_eq!(services.order_count().await, 0);
}

#[tokio::test]
async fn test_created_without_id_is_invalid_body() {
    init_tracing();
    let services = MockServices::start_with(Behavior {
        omit_customer_id: true,
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
        AcceptanceError::InvalidBody {
            action: "create customer",
            ..
        }
    ));
    assert!(err.to_string().contains("customer_id"));

    // No id came back, so the product step never ran and there is nothing
    // the harness could delete.
    assert_eq!(services.requests().await.len(), 1);
    assert_eq!(outcome.cleanup.customer, CleanupAction::Skipped);
}

// ============================================================================
// Network errors
// ============================================================================

#[tokio::test]
async fn test_unreachable_customer_service_is_network_error() {
    init_tracing();
    let services = MockServices::start().await;
    let mocked = services.endpoints();

    let endpoints = ServiceEndpoints::parse(
        mocked.product.as_str(),
        mocked.order.as_str(),
        &unreachable_url().await,
    )
    .unwrap();
    let config = AcceptanceConfig::new(endpoints).with_settle_delay(Duration::ZERO);

    let err = runner::run(&config).await.unwrap_err();
    assert!(err.is_network());
    assert!(
        err.to_string()
            .starts_with("A network error occurred while trying to create customer")
    );
    assert!(services.requests().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_order_service_cleans_up_other_fixtures() {
    init_tracing();
    let services = MockServices::start().await;
    let mocked = services.endpoints();

    let endpoints = ServiceEndpoints::parse(
        mocked.product.as_str(),
        &unreachable_url().await,
        mocked.customer.as_str(),
    )
    .unwrap();
    let config = AcceptanceConfig::new(endpoints).with_settle_delay(Duration::ZERO);

    let outcome = AcceptanceRun::new(&config, RunId::random())
        .unwrap()
        .execute()
        .await;

    assert!(outcome.result.unwrap_err().is_network());
    assert!(outcome.cleanup.is_clean());
    assert_eq!(services.customer_count().await, 0);
    assert_eq!(services.product_count().await, 0);
}

#[tokio::test]
async fn test_slow_order_lookup_times_out() {
    init_tracing();
    let services = MockServices::start_with(Behavior {
        order_lookup_delay: Duration::from_secs(3),
        ..Behavior::default()
    })
    .await;

    let config = services
        .config()
        .with_settle_delay(Duration::ZERO)
        .with_request_timeout(Duration::from_millis(500));

    let outcome = AcceptanceRun::new(&config, RunId::random())
        .unwrap()
        .execute()
        .await;

    match outcome.result {
        Err(AcceptanceError::Network { action, source }) => {
            assert_eq!(action, "fetch order");
            assert!(source.is_timeout());
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(outcome.cleanup.is_clean());
}

// ============================================================================
// Cleanup
// ============================================================================

#[tokio::test]
async fn test_deleting_missing_fixture_is_tolerated() {
    init_tracing();
    let services = MockServices::start().await;
    let client = order_flow_cli::ServiceClient::new(services.endpoints(), Duration::from_secs(5))
        .unwrap();

    let status = client
        .delete_product(order_flow_core::ProductId::new(987_654))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    let status = client
        .delete_customer(order_flow_core::CustomerId::new(987_654))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
}
