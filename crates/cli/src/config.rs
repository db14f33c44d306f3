//! Acceptance run configuration from command-line flags and environment.
//!
//! # Environment Variables
//!
//! Each flag falls back to an environment variable. A `.env` file in the
//! working directory is loaded first if present.
//!
//! ## Required (flag or variable)
//! - `PRODUCT_SERVICE_URL` / `--product-url` - Product service base URL
//! - `ORDER_SERVICE_URL` / `--order-url` - Order service base URL
//! - `CUSTOMER_SERVICE_URL` / `--customer-url` - Customer service base URL
//!
//! ## Optional
//! - `ACCEPTANCE_SETTLE_DELAY_SECS` / `--settle-delay-secs` - Pause before verification (default: 2)
//! - `ACCEPTANCE_REQUEST_TIMEOUT_SECS` / `--request-timeout-secs` - Per-request timeout (default: 10)

use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use url::Url;

/// Default pause between placing the order and verifying it.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Default timeout applied to every HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "order-flow-acceptance")]
#[command(author, version, about = "Run E2E Acceptance Tests.")]
pub struct Args {
    /// Base URL of the product service
    #[arg(long, env = "PRODUCT_SERVICE_URL")]
    pub product_url: String,

    /// Base URL of the order service
    #[arg(long, env = "ORDER_SERVICE_URL")]
    pub order_url: String,

    /// Base URL of the customer service
    #[arg(long, env = "CUSTOMER_SERVICE_URL")]
    pub customer_url: String,

    /// Seconds to wait after placing the order before verifying it
    #[arg(long, env = "ACCEPTANCE_SETTLE_DELAY_SECS", default_value_t = 2)]
    pub settle_delay_secs: u64,

    /// Timeout in seconds for each HTTP request
    #[arg(long, env = "ACCEPTANCE_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,
}

/// A validated service base URL with no trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrl(String);

impl ServiceUrl {
    /// Validate `raw` as an absolute `http`/`https` URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` naming `name` if `raw` does not parse
    /// or uses another scheme.
    pub fn parse(name: &'static str, raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
            name,
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                name,
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(Self(url.as_str().trim_end_matches('/').to_owned()))
    }

    /// Join `path` (which must start with `/`) onto the base URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Base URLs of the three services under test.
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    pub product: ServiceUrl,
    pub order: ServiceUrl,
    pub customer: ServiceUrl,
}

impl ServiceEndpoints {
    /// Validate the three base URLs.
    ///
    /// # Errors
    ///
    /// Returns the first URL that fails validation.
    pub fn parse(product: &str, order: &str, customer: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            product: ServiceUrl::parse("product service", product)?,
            order: ServiceUrl::parse("order service", order)?,
            customer: ServiceUrl::parse("customer service", customer)?,
        })
    }
}

/// Everything an acceptance run needs.
#[derive(Debug, Clone)]
pub struct AcceptanceConfig {
    pub endpoints: ServiceEndpoints,
    /// Pause before the verification step.
    pub settle_delay: Duration,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl AcceptanceConfig {
    /// Configuration with the default settle delay and request timeout.
    #[must_use]
    pub const fn new(endpoints: ServiceEndpoints) -> Self {
        Self {
            endpoints,
            settle_delay: DEFAULT_SETTLE_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Parse arguments from the process command line and environment.
    ///
    /// Calls `dotenvy::dotenv()` first so `.env` values act as defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL or the timeout is invalid. Malformed
    /// command lines are reported by clap, which exits the process.
    pub fn from_cli() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::try_from(Args::parse())
    }
}

impl TryFrom<Args> for AcceptanceConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let endpoints =
            ServiceEndpoints::parse(&args.product_url, &args.order_url, &args.customer_url)?;

        Ok(Self::new(endpoints)
            .with_settle_delay(Duration::from_secs(args.settle_delay_secs))
            .with_request_timeout(Duration::from_secs(args.request_timeout_secs)))
    }
}
