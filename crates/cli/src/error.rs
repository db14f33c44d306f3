//! Failure taxonomy for an acceptance run.

use order_flow_core::OrderStatus;
use reqwest::StatusCode;
use thiserror::Error;

/// Why an acceptance run failed.
///
/// Every variant aborts the remaining steps; cleanup still runs.
#[derive(Debug, Error)]
pub enum AcceptanceError {
    /// A service answered with a status other than the one the step expects.
    #[error("Failed to {action}. Status: {status}, Body: {body}")]
    UnexpectedStatus {
        action: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The request never produced a response (refused, reset, timed out).
    #[error("A network error occurred while trying to {action}: {source}")]
    Network {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The status was right but the body lacked the expected fields.
    #[error("Unexpected response body while trying to {action}: {message}. Body: {body}")]
    InvalidBody {
        action: &'static str,
        message: String,
        body: String,
    },

    /// The order did not reach the expected status.
    #[error("Order status verification failed. Expected '{expected}', got '{actual}'.")]
    StatusMismatch {
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// The product stock was not deducted by the ordered quantity.
    #[error("Stock deduction verification failed. Expected {expected}, found {found}.")]
    StockMismatch { expected: i32, found: i32 },

    /// The scenario could not build its fixtures.
    #[error("Invalid fixture: {0}")]
    Fixture(String),
}

impl AcceptanceError {
    /// Wrap a transport error for `action`.
    pub(crate) fn network(action: &'static str, source: reqwest::Error) -> Self {
        Self::Network { action, source }
    }

    /// True for connection and timeout failures.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
