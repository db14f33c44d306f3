//! Request and response payloads for the three services.
//!
//! Field names match the JSON contracts exactly; none of these types rename
//! fields on the wire.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{CreatedCustomer, NewCustomer};
pub use order::{CreatedOrder, NewOrder, Order, OrderItem};
pub use product::{CreatedProduct, NewProduct, Product};
