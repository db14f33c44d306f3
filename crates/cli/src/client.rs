//! HTTP client for the product, order, and customer services.
//!
//! Every call is a single attempt bounded by the configured timeout. Status
//! codes are checked here so the runner only sees typed results or an
//! [`AcceptanceError`].

use std::time::Duration;

use order_flow_core::{
    CreatedCustomer, CreatedOrder, CreatedProduct, CustomerId, NewCustomer, NewOrder, NewProduct,
    Order, OrderId, Product, ProductId,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ServiceEndpoints;
use crate::error::AcceptanceError;

/// Client for the three services under test.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    endpoints: ServiceEndpoints,
}

impl ServiceClient {
    /// Build a client whose requests time out after `request_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(
        endpoints: ServiceEndpoints,
        request_timeout: Duration,
    ) -> Result<Self, AcceptanceError> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AcceptanceError::network("build the HTTP client", e))?;

        Ok(Self { http, endpoints })
    }

    // =========================================================================
    // Customer service
    // =========================================================================

    /// `POST /customers/`, expecting 201.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-201 status, or a body
    /// without `customer_id`.
    #[instrument(skip_all, fields(email = %customer.email))]
    pub async fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> Result<CustomerId, AcceptanceError> {
        let url = self.endpoints.customer.join("/customers/");
        let created: CreatedCustomer = Self::expect_json(
            self.http.post(url).json(customer),
            "create customer",
            StatusCode::CREATED,
        )
        .await?;
        Ok(created.customer_id)
    }

    /// `DELETE /customers/{id}`, returning whatever status the service sent.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<StatusCode, AcceptanceError> {
        let url = self.endpoints.customer.join(&format!("/customers/{id}"));
        Self::status_of(self.http.delete(url), "delete customer").await
    }

    // =========================================================================
    // Product service
    // =========================================================================

    /// `POST /products/`, expecting 201.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-201 status, or a body
    /// without `product_id`.
    #[instrument(skip_all, fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<ProductId, AcceptanceError> {
        let url = self.endpoints.product.join("/products/");
        let created: CreatedProduct = Self::expect_json(
            self.http.post(url).json(product),
            "create product",
            StatusCode::CREATED,
        )
        .await?;
        Ok(created.product_id)
    }

    /// `GET /products/{id}`, expecting 200.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-200 status, or a body
    /// without `stock_quantity`.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, AcceptanceError> {
        let url = self.endpoints.product.join(&format!("/products/{id}"));
        Self::expect_json(self.http.get(url), "fetch product", StatusCode::OK).await
    }

    /// `DELETE /products/{id}`, returning whatever status the service sent.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<StatusCode, AcceptanceError> {
        let url = self.endpoints.product.join(&format!("/products/{id}"));
        Self::status_of(self.http.delete(url), "delete product").await
    }

    // =========================================================================
    // Order service
    // =========================================================================

    /// `POST /orders/`, expecting 201.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-201 status, or a body
    /// without `order_id`.
    #[instrument(skip_all, fields(user_id = %order.user_id))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderId, AcceptanceError> {
        let url = self.endpoints.order.join("/orders/");
        let created: CreatedOrder = Self::expect_json(
            self.http.post(url).json(order),
            "create order",
            StatusCode::CREATED,
        )
        .await?;
        Ok(created.order_id)
    }

    /// `GET /orders/{id}`, expecting 200.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-200 status, or a body
    /// without `status`.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, AcceptanceError> {
        let url = self.endpoints.order.join(&format!("/orders/{id}"));
        Self::expect_json(self.http.get(url), "fetch order", StatusCode::OK).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn expect_json<T: DeserializeOwned>(
        request: RequestBuilder,
        action: &'static str,
        expected: StatusCode,
    ) -> Result<T, AcceptanceError> {
        let response = request
            .send()
            .await
            .map_err(|e| AcceptanceError::network(action, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AcceptanceError::network(action, e))?;

        debug!(action, %status, body = %body, "Service responded");

        if status != expected {
            return Err(AcceptanceError::UnexpectedStatus {
                action,
                status,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| AcceptanceError::InvalidBody {
            action,
            message: e.to_string(),
            body,
        })
    }

    async fn status_of(
        request: RequestBuilder,
        action: &'static str,
    ) -> Result<StatusCode, AcceptanceError> {
        let response = request
            .send()
            .await
            .map_err(|e| AcceptanceError::network(action, e))?;
        debug!(action, status = %response.status(), "Service responded");
        Ok(response.status())
    }
}
