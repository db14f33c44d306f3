//! Order Flow acceptance run.
//!
//! Drives the customer, product, and order services through one purchase and
//! checks that the order is confirmed and stock is deducted. The binary in
//! `main.rs` wraps [`runner::run`] and turns its result into an exit code;
//! integration tests drive [`runner::AcceptanceRun`] directly.
//!
//! # Modules
//!
//! - [`config`] - Flags, environment fallbacks, and URL validation
//! - [`client`] - HTTP calls to the three services
//! - [`scenario`] - Fixture payloads and expected values
//! - [`runner`] - Step sequence and cleanup
//! - [`error`] - Failure taxonomy
//! - [`verdict`] - Final message and exit code

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod runner;
pub mod scenario;
pub mod verdict;

pub use client::ServiceClient;
pub use config::{AcceptanceConfig, ConfigError, ServiceEndpoints, ServiceUrl};
pub use error::AcceptanceError;
pub use runner::{AcceptanceRun, CleanupAction, CleanupReport, RunOutcome, RunReport};
pub use scenario::{RunId, Scenario};
pub use verdict::Verdict;
