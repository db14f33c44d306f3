//! Order Flow Core - Wire types for the acceptance harness.
//!
//! This crate describes the HTTP contracts of the three services exercised by
//! the acceptance run:
//! - customer service - `POST /customers/`, `DELETE /customers/{id}`
//! - product service - `POST /products/`, `GET /products/{id}`, `DELETE /products/{id}`
//! - order service - `POST /orders/`, `GET /orders/{id}`
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The runner
//! in `order-flow-cli` and the mock services in the integration tests both
//! speak through these types, so the two sides cannot drift apart.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and order statuses
//! - [`models`] - Request and response payloads for each service

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
