//! Acceptance run against real deployments.
//!
//! These tests require the three services to be running and reachable:
//! - `PRODUCT_SERVICE_URL`
//! - `ORDER_SERVICE_URL`
//! - `CUSTOMER_SERVICE_URL`
//!
//! Run with: cargo test -p order-flow-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use order_flow_cli::{AcceptanceConfig, ServiceEndpoints, runner};
use order_flow_integration_tests::init_tracing;

fn live_config() -> AcceptanceConfig {
    let var = |name: &str| std::env::var(name).unwrap_or_else(|_| panic!("{name} not set"));
    let endpoints = ServiceEndpoints::parse(
        &var("PRODUCT_SERVICE_URL"),
        &var("ORDER_SERVICE_URL"),
        &var("CUSTOMER_SERVICE_URL"),
    )
    .unwrap();
    AcceptanceConfig::new(endpoints)
}

#[tokio::test]
#[ignore = "Requires running product, order, and customer services"]
async fn test_live_purchase_flow() {
    init_tracing();
    let report = runner::run(&live_config()).await.unwrap();
    assert_eq!(report.final_stock, 48);
}
