//! Sequential acceptance run with guaranteed fixture cleanup.
//!
//! # Flow
//!
//! 1. Create a customer
//! 2. Create a product
//! 3. Place an order for the product
//! 4. Wait for the settle delay, then verify order status and stock
//!
//! Whatever happens in steps 1-4, the fixtures created so far are deleted
//! afterwards. The order itself is left in place.

use std::fmt;
use std::time::Duration;

use order_flow_core::{CustomerId, OrderId, OrderStatus, ProductId};
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::client::ServiceClient;
use crate::config::AcceptanceConfig;
use crate::error::AcceptanceError;
use crate::scenario::{RunId, Scenario};

/// Summary of a passing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: RunId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub order_id: OrderId,
    pub order_status: OrderStatus,
    pub final_stock: i32,
}

/// What happened to one fixture during cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CleanupAction {
    /// The fixture was never created.
    #[default]
    Skipped,
    /// The service accepted the delete.
    Deleted(StatusCode),
    /// The service answered with a non-success status.
    Rejected(StatusCode),
    /// The delete request never got a response.
    Failed(String),
}

impl CleanupAction {
    fn from_result(result: Result<StatusCode, AcceptanceError>) -> Self {
        match result {
            Ok(status) if status.is_success() => Self::Deleted(status),
            Ok(status) => Self::Rejected(status),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// True unless a delete was attempted and did not succeed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        matches!(self, Self::Skipped | Self::Deleted(_))
    }
}

impl fmt::Display for CleanupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => f.write_str("skipped"),
            Self::Deleted(status) => write!(f, "deleted ({})", status.as_u16()),
            Self::Rejected(status) => write!(f, "rejected ({})", status.as_u16()),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// Outcome of the cleanup phase. Never turned into a run failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanupReport {
    pub product: CleanupAction,
    pub customer: CleanupAction,
}

impl CleanupReport {
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.product.is_clean() && self.customer.is_clean()
    }
}

/// Result of [`AcceptanceRun::execute`].
#[derive(Debug)]
pub struct RunOutcome {
    pub result: Result<RunReport, AcceptanceError>,
    pub cleanup: CleanupReport,
}

/// Ids of fixtures created so far, in creation order.
#[derive(Debug, Default)]
struct Fixtures {
    customer: Option<CustomerId>,
    product: Option<ProductId>,
}

impl Fixtures {
    /// Delete whatever was created. Errors are logged and swallowed.
    async fn cleanup(&self, client: &ServiceClient) -> CleanupReport {
        info!("--- Starting Cleanup ---");
        let mut report = CleanupReport::default();

        if let Some(id) = self.product {
            info!("Deleting product {id}...");
            report.product = CleanupAction::from_result(client.delete_product(id).await);
            if !report.product.is_clean() {
                warn!(product_id = %id, outcome = ?report.product, "Product cleanup failed");
            }
        }

        if let Some(id) = self.customer {
            info!("Deleting customer {id}...");
            report.customer = CleanupAction::from_result(client.delete_customer(id).await);
            if !report.customer.is_clean() {
                warn!(customer_id = %id, outcome = ?report.customer, "Customer cleanup failed");
            }
        }

        if report.is_clean() {
            info!(
                clean = true,
                product = %report.product,
                customer = %report.customer,
                "Cleanup complete."
            );
        } else {
            warn!(
                clean = false,
                product = %report.product,
                customer = %report.customer,
                "Cleanup complete with leftovers."
            );
        }
        report
    }
}

/// One end-to-end pass over the three services.
#[derive(Debug, Clone)]
pub struct AcceptanceRun {
    client: ServiceClient,
    scenario: Scenario,
    settle_delay: Duration,
}

impl AcceptanceRun {
    /// Prepare a run tagged with `run_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AcceptanceConfig, run_id: RunId) -> Result<Self, AcceptanceError> {
        let client = ServiceClient::new(config.endpoints.clone(), config.request_timeout)?;
        Ok(Self {
            client,
            scenario: Scenario::new(run_id),
            settle_delay: config.settle_delay,
        })
    }

    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.scenario.run_id()
    }

    /// Run every step, then clean up regardless of the result.
    pub async fn execute(&self) -> RunOutcome {
        info!(run_id = %self.run_id(), "--- Starting End-to-End Acceptance Tests ---");

        let mut fixtures = Fixtures::default();
        let result = self.steps(&mut fixtures).await;
        let cleanup = fixtures.cleanup(&self.client).await;

        RunOutcome { result, cleanup }
    }

    async fn steps(&self, fixtures: &mut Fixtures) -> Result<RunReport, AcceptanceError> {
        info!("[1/4] Creating a new customer...");
        let customer = self.scenario.customer()?;
        let customer_id = self.client.create_customer(&customer).await?;
        fixtures.customer = Some(customer_id);
        info!("Customer created successfully with ID: {customer_id}");

        info!("[2/4] Creating a new product...");
        let product_id = self.client.create_product(&self.scenario.product()).await?;
        fixtures.product = Some(product_id);
        info!("Product created successfully with ID: {product_id}");

        info!("[3/4] Placing an order for the new product...");
        let order = self.scenario.order(customer_id, product_id);
        let order_id = self.client.create_order(&order).await?;
        info!("Order placed successfully with ID: {order_id}");

        info!("[4/4] Verifying order status and stock deduction...");
        tokio::time::sleep(self.settle_delay).await;

        let expected_status = self.scenario.expected_status();
        let order_status = self.client.get_order(order_id).await?.status;
        if order_status != expected_status {
            return Err(AcceptanceError::StatusMismatch {
                expected: expected_status,
                actual: order_status,
            });
        }
        info!("Order status is '{order_status}' as expected.");

        let expected_stock = self.scenario.expected_stock();
        let final_stock = self.client.get_product(product_id).await?.stock_quantity;
        if final_stock != expected_stock {
            return Err(AcceptanceError::StockMismatch {
                expected: expected_stock,
                found: final_stock,
            });
        }
        info!("Product stock correctly deducted to {final_stock}.");

        Ok(RunReport {
            run_id: self.run_id(),
            customer_id,
            product_id,
            order_id,
            order_status,
            final_stock,
        })
    }
}

/// Run the scenario once with a fresh random run id.
///
/// # Errors
///
/// Returns the first failure of the run. Cleanup has already happened by the
/// time this returns.
pub async fn run(config: &AcceptanceConfig) -> Result<RunReport, AcceptanceError> {
    let outcome = AcceptanceRun::new(config, RunId::random())?.execute().await;
    outcome.result
}
