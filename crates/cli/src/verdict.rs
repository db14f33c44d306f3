//! Final pass/fail line and process exit code.

use std::fmt;
use std::process::ExitCode;

/// Outcome of the whole process, from configuration through cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    /// Carries the failure message shown to the operator.
    Failed(String),
}

impl Verdict {
    /// Exit code for a passing run.
    pub const SUCCESS_CODE: u8 = 0;
    /// Exit code for any configuration, network, or verification failure.
    pub const FAILURE_CODE: u8 = 1;

    /// Verdict for a configuration or run result.
    #[must_use]
    pub fn from_result<T, E: fmt::Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Passed,
            Err(e) => Self::failed(e),
        }
    }

    #[must_use]
    pub fn failed(error: &impl fmt::Display) -> Self {
        Self::Failed(error.to_string())
    }

    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Passed => Self::SUCCESS_CODE,
            Self::Failed(_) => Self::FAILURE_CODE,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("--- All Acceptance Tests Passed! ---"),
            Self::Failed(message) => write!(f, "ACCEPTANCE TEST FAILED: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::config::{ConfigError, ServiceUrl};
    use crate::error::AcceptanceError;

    #[test]
    fn test_pass_exits_zero() {
        let verdict = Verdict::from_result(&Ok::<(), AcceptanceError>(()));
        assert_eq!(verdict, Verdict::Passed);
        assert_eq!(verdict.code(), 0);
        assert_eq!(verdict.to_string(), "--- All Acceptance Tests Passed! ---");
    }

    #[test]
    fn test_run_failure_exits_one_with_message() {
        let result: Result<(), _> = Err(AcceptanceError::StockMismatch {
            expected: 48,
            found: 50,
        });
        let verdict = Verdict::from_result(&result);
        assert_eq!(verdict.code(), 1);
        assert_eq!(
            verdict.to_string(),
            "ACCEPTANCE TEST FAILED: Stock deduction verification failed. Expected 48, found 50."
        );
    }

    #[test]
    fn test_status_failure_keeps_body() {
        let result: Result<(), _> = Err(AcceptanceError::UnexpectedStatus {
            action: "create customer",
            status: StatusCode::BAD_REQUEST,
            body: "bad email".to_owned(),
        });
        assert_eq!(
            Verdict::from_result(&result).to_string(),
            "ACCEPTANCE TEST FAILED: Failed to create customer. Status: 400 Bad Request, Body: bad email"
        );
    }

    #[test]
    fn test_config_failure_exits_one() {
        let result = ServiceUrl::parse("product service", "ftp://x");
        let verdict = Verdict::from_result(&result);
        assert_eq!(verdict.code(), 1);
        assert!(verdict.to_string().starts_with(
            "ACCEPTANCE TEST FAILED: Invalid URL for product service: unsupported scheme 'ftp'"
        ));

        let verdict = Verdict::failed(&ConfigError::ZeroTimeout);
        assert_eq!(verdict.code(), 1);
    }
}
