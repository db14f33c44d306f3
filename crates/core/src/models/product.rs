//! Product service payloads.

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// Body of `POST /products/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock_quantity: i32,
}

/// Response of `POST /products/` (HTTP 201).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProduct {
    pub product_id: ProductId,
}

/// Response of `GET /products/{id}`.
///
/// Only `stock_quantity` is required; services that return a thinner record
/// still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    pub stock_quantity: i32,
}
