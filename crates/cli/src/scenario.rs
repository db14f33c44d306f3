//! The fixed purchase scenario and its per-run fixtures.
//!
//! A run creates one customer and one product, orders [`ORDER_QUANTITY`]
//! units, and expects stock to drop from [`INITIAL_STOCK`] by that amount.
//! A random [`RunId`] is folded into every field the services may treat as
//! unique, so repeated or overlapping runs do not collide.

use std::fmt;
use std::ops::RangeInclusive;

use order_flow_core::{
    CustomerId, Email, NewCustomer, NewOrder, NewProduct, OrderItem, OrderStatus, Price, ProductId,
};
use rand::Rng;
use secrecy::SecretString;

use crate::error::AcceptanceError;

/// Stock the fixture product is created with.
pub const INITIAL_STOCK: i32 = 50;

/// Units ordered by the fixture order.
pub const ORDER_QUANTITY: i32 = 2;

/// Unit price of the fixture product, in cents.
pub const UNIT_PRICE_CENTS: i64 = 1999;

/// Random tag distinguishing one run's fixtures from another's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u16);

impl RunId {
    /// Range run ids are drawn from.
    pub const RANGE: RangeInclusive<u16> = 1000..=9999;

    /// Draw a fresh run id.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::rng().random_range(Self::RANGE))
    }

    /// Use a specific run id, clamped into [`RunId::RANGE`].
    #[must_use]
    pub fn new(id: u16) -> Self {
        Self(id.clamp(*Self::RANGE.start(), *Self::RANGE.end()))
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixture payloads for one run.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    run_id: RunId,
}

impl Scenario {
    #[must_use]
    pub const fn new(run_id: RunId) -> Self {
        Self { run_id }
    }

    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The customer to register.
    ///
    /// # Errors
    ///
    /// Returns `AcceptanceError::Fixture` if the generated email is invalid.
    pub fn customer(&self) -> Result<NewCustomer, AcceptanceError> {
        let email = Email::tagged("testuser", self.run_id, "example.com")
            .map_err(|e| AcceptanceError::Fixture(e.to_string()))?;

        Ok(NewCustomer {
            email,
            password: SecretString::from("password123"),
            first_name: "Test".to_owned(),
            last_name: format!("User{}", self.run_id),
            phone_number: "0987654321".to_owned(),
            shipping_address: "Deakin University".to_owned(),
        })
    }

    /// The product to list.
    #[must_use]
    pub fn product(&self) -> NewProduct {
        NewProduct {
            name: format!("Acceptance Test Widget {}", self.run_id),
            description: "A product for our E2E test.".to_owned(),
            price: unit_price(),
            stock_quantity: INITIAL_STOCK,
        }
    }

    /// The order `customer` places for `product`.
    #[must_use]
    pub fn order(&self, customer: CustomerId, product: ProductId) -> NewOrder {
        NewOrder {
            user_id: customer,
            items: vec![OrderItem {
                product_id: product,
                quantity: ORDER_QUANTITY,
                price_at_purchase: unit_price(),
            }],
        }
    }

    /// Stock the product should report once the order is processed.
    #[must_use]
    pub const fn expected_stock(&self) -> i32 {
        INITIAL_STOCK - ORDER_QUANTITY
    }

    /// Status the order should report once processed.
    #[must_use]
    pub const fn expected_status(&self) -> OrderStatus {
        OrderStatus::Confirmed
    }
}

fn unit_price() -> Price {
    Price::from_cents(UNIT_PRICE_CENTS)
}
