//! Order service payloads.

use serde::{Deserialize, Serialize};

use crate::{CustomerId, OrderId, OrderStatus, Price, ProductId};

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price_at_purchase: Price,
}

/// Body of `POST /orders/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// The customer placing the order.
    pub user_id: CustomerId,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Total quantity ordered for `product_id` across all lines.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> i32 {
        self.items
            .iter()
            .filter(|item| item.product_id == product_id)
            .map(|item| item.quantity)
            .sum()
    }
}

/// Response of `POST /orders/` (HTTP 201).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub order_id: OrderId,
}

/// Response of `GET /orders/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<CustomerId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
}
