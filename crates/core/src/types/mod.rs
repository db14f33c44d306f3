//! Core types for the acceptance harness.
//!
//! This module provides type-safe wrappers for the values exchanged with the
//! services under test.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::OrderStatus;
