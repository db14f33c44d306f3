//! In-process mock services for exercising the acceptance run.
//!
//! [`MockServices`] starts three axum servers on random local ports, one each
//! for the customer, product, and order services. They share a single
//! [`ShopState`], so placing an order deducts stock from the product service
//! the same way the real deployment does.
//!
//! # Running Tests
//!
//! ```bash
//! # Everything against the mocks
//! cargo test -p order-flow-integration-tests
//!
//! # Against real services
//! PRODUCT_SERVICE_URL=... ORDER_SERVICE_URL=... CUSTOMER_SERVICE_URL=... \
//!     cargo test -p order-flow-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use order_flow_cli::{AcceptanceConfig, ServiceEndpoints};
use order_flow_core::{
    CreatedCustomer, CreatedOrder, CreatedProduct, CustomerId, NewCustomer, NewOrder, NewProduct,
    Order, OrderId, OrderStatus, Product, ProductId,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// How the mock services respond.
#[derive(Debug, Clone)]
pub struct Behavior {
    /// Reject `POST /customers/` with this status.
    pub reject_customer: Option<StatusCode>,
    /// Reject `POST /products/` with this status.
    pub reject_product: Option<StatusCode>,
    /// Reject `POST /orders/` with this status.
    pub reject_order: Option<StatusCode>,
    /// Status an order moves to once `settle_time` has passed.
    pub settled_status: OrderStatus,
    /// Time an order stays `pending` after creation.
    pub settle_time: Duration,
    /// Whether placing an order deducts stock.
    pub deduct_stock: bool,
    /// Answer `POST /customers/` with 201 but without `customer_id`.
    pub omit_customer_id: bool,
    /// Delay every `GET /orders/{id}` by this much.
    pub order_lookup_delay: Duration,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            reject_customer: None,
            reject_product: None,
            reject_order: None,
            settled_status: OrderStatus::Confirmed,
            settle_time: Duration::ZERO,
            deduct_stock: true,
            omit_customer_id: false,
            order_lookup_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
struct StoredOrder {
    order: NewOrder,
    placed_at: Instant,
}

/// Everything the three mock services know.
#[derive(Debug, Default)]
pub struct ShopState {
    behavior: Behavior,
    next_id: i64,
    customers: HashMap<CustomerId, NewCustomer>,
    products: HashMap<ProductId, NewProduct>,
    orders: HashMap<OrderId, StoredOrder>,
    requests: Vec<String>,
}

impl ShopState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, request: String) {
        tracing::debug!(%request, "Mock service request");
        self.requests.push(request);
    }

    fn status_of(&self, stored: &StoredOrder) -> OrderStatus {
        if stored.placed_at.elapsed() >= self.behavior.settle_time {
            self.behavior.settled_status.clone()
        } else {
            OrderStatus::Pending
        }
    }
}

type SharedState = Arc<RwLock<ShopState>>;

/// Three running mock services sharing one [`ShopState`].
pub struct MockServices {
    state: SharedState,
    customer_addr: SocketAddr,
    product_addr: SocketAddr,
    order_addr: SocketAddr,
    _handles: Vec<JoinHandle<()>>,
}

impl MockServices {
    /// Start the services with default behavior: everything succeeds and
    /// orders confirm immediately.
    pub async fn start() -> Self {
        Self::start_with(Behavior::default()).await
    }

    /// Start the services with custom behavior.
    ///
    /// # Panics
    ///
    /// Panics if a local port cannot be bound.
    pub async fn start_with(behavior: Behavior) -> Self {
        let state = Arc::new(RwLock::new(ShopState {
            behavior,
            ..ShopState::default()
        }));

        let customer_app = Router::new()
            .route("/customers/", post(create_customer))
            .route("/customers/{id}", delete(delete_customer))
            .with_state(Arc::clone(&state));

        let product_app = Router::new()
            .route("/products/", post(create_product))
            .route("/products/{id}", get(get_product).delete(delete_product))
            .with_state(Arc::clone(&state));

        let order_app = Router::new()
            .route("/orders/", post(create_order))
            .route("/orders/{id}", get(get_order))
            .with_state(Arc::clone(&state));

        let (customer_addr, customer_handle) = serve(customer_app).await;
        let (product_addr, product_handle) = serve(product_app).await;
        let (order_addr, order_handle) = serve(order_app).await;

        Self {
            state,
            customer_addr,
            product_addr,
            order_addr,
            _handles: vec![customer_handle, product_handle, order_handle],
        }
    }

    /// Base URLs of the three services.
    ///
    /// # Panics
    ///
    /// Panics if the generated URLs fail validation, which cannot happen for
    /// loopback socket addresses.
    #[must_use]
    pub fn endpoints(&self) -> ServiceEndpoints {
        ServiceEndpoints::parse(
            &format!("http://{}", self.product_addr),
            &format!("http://{}", self.order_addr),
            &format!("http://{}", self.customer_addr),
        )
        .expect("loopback URLs are valid")
    }

    /// Run configuration with a short settle delay suited to tests.
    #[must_use]
    pub fn config(&self) -> AcceptanceConfig {
        AcceptanceConfig::new(self.endpoints())
            .with_settle_delay(Duration::from_millis(50))
            .with_request_timeout(Duration::from_secs(5))
    }

    /// Requests received so far, as `"METHOD /path"`, in arrival order.
    pub async fn requests(&self) -> Vec<String> {
        self.state.read().await.requests.clone()
    }

    /// Number of customers currently registered.
    pub async fn customer_count(&self) -> usize {
        self.state.read().await.customers.len()
    }

    /// Number of products currently listed.
    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }

    /// Number of orders placed.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }
}

/// A URL nothing is listening on.
///
/// # Panics
///
/// Panics if a local port cannot be bound.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Failed to get local address");
    drop(listener);
    format!("http://{addr}")
}

/// Route test logs through the test harness's captured output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_flow_cli=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

async fn serve(app: Router) -> (SocketAddr, JoinHandle<()>) {
    // Bind to port 0 to get a random available port
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock service");
    let addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Mock service failed");
    });

    (addr, handle)
}

// =============================================================================
// Customer service
// =============================================================================

async fn create_customer(
    State(state): State<SharedState>,
    Json(customer): Json<NewCustomer>,
) -> Response {
    let mut state = state.write().await;
    state.record("POST /customers/".to_owned());

    if let Some(status) = state.behavior.reject_customer {
        return (status, format!("customer rejected: {}", customer.email)).into_response();
    }
    if state.customers.values().any(|c| c.email == customer.email) {
        return (StatusCode::CONFLICT, "email already registered").into_response();
    }

    let id = CustomerId::new(state.next_id());
    state.customers.insert(id, customer);

    if state.behavior.omit_customer_id {
        return (StatusCode::CREATED, Json(serde_json::json!({"ok": true}))).into_response();
    }
    (StatusCode::CREATED, Json(CreatedCustomer { customer_id: id })).into_response()
}

async fn delete_customer(State(state): State<SharedState>, Path(id): Path<i64>) -> StatusCode {
    let mut state = state.write().await;
    state.record(format!("DELETE /customers/{id}"));

    if state.customers.remove(&CustomerId::new(id)).is_some() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// =============================================================================
// Product service
// =============================================================================

async fn create_product(
    State(state): State<SharedState>,
    Json(product): Json<NewProduct>,
) -> Response {
    let mut state = state.write().await;
    state.record("POST /products/".to_owned());

    if let Some(status) = state.behavior.reject_product {
        return (status, "product rejected").into_response();
    }

    let id = ProductId::new(state.next_id());
    state.products.insert(id, product);
    (StatusCode::CREATED, Json(CreatedProduct { product_id: id })).into_response()
}

async fn get_product(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let mut state = state.write().await;
    state.record(format!("GET /products/{id}"));

    let id = ProductId::new(id);
    match state.products.get(&id) {
        Some(product) => Json(Product {
            product_id: Some(id),
            name: Some(product.name.clone()),
            price: Some(product.price),
            stock_quantity: product.stock_quantity,
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_product(State(state): State<SharedState>, Path(id): Path<i64>) -> StatusCode {
    let mut state = state.write().await;
    state.record(format!("DELETE /products/{id}"));

    if state.products.remove(&ProductId::new(id)).is_some() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// =============================================================================
// Order service
// =============================================================================

async fn create_order(State(state): State<SharedState>, Json(order): Json<NewOrder>) -> Response {
    let mut state = state.write().await;
    state.record("POST /orders/".to_owned());

    if let Some(status) = state.behavior.reject_order {
        return (status, "order rejected").into_response();
    }
    if !state.customers.contains_key(&order.user_id) {
        return (StatusCode::UNPROCESSABLE_ENTITY, "unknown customer").into_response();
    }

    for item in &order.items {
        let Some(product) = state.products.get(&item.product_id) else {
            return (StatusCode::UNPROCESSABLE_ENTITY, "unknown product").into_response();
        };
        if product.stock_quantity < item.quantity {
            return (StatusCode::CONFLICT, "insufficient stock").into_response();
        }
    }

    if state.behavior.deduct_stock {
        for item in &order.items {
            if let Some(product) = state.products.get_mut(&item.product_id) {
                product.stock_quantity -= item.quantity;
            }
        }
    }

    let id = OrderId::new(state.next_id());
    state.orders.insert(
        id,
        StoredOrder {
            order,
            placed_at: Instant::now(),
        },
    );
    (StatusCode::CREATED, Json(CreatedOrder { order_id: id })).into_response()
}

async fn get_order(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let delay = {
        let mut state = state.write().await;
        state.record(format!("GET /orders/{id}"));
        state.behavior.order_lookup_delay
    };
    tokio::time::sleep(delay).await;

    let state = state.read().await;
    let id = OrderId::new(id);
    match state.orders.get(&id) {
        Some(stored) => Json(Order {
            order_id: Some(id),
            user_id: Some(stored.order.user_id),
            items: stored.order.items.clone(),
            status: state.status_of(stored),
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
