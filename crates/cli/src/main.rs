//! Order Flow acceptance CLI - end-to-end check across three services.
//!
//! # Usage
//!
//! ```bash
//! order-flow-acceptance \
//!     --product-url http://localhost:8000 \
//!     --order-url http://localhost:8001 \
//!     --customer-url http://localhost:8002
//!
//! # Longer settle delay for slow order processing
//! order-flow-acceptance --settle-delay-secs 5 ...
//! ```
//!
//! Exits 0 when every step passes and 1 on any failure. Progress is logged
//! to stdout; set `RUST_LOG=debug` to include response bodies.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use order_flow_cli::{AcceptanceConfig, Verdict, runner};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .without_time()
        .init();

    let verdict = match AcceptanceConfig::from_cli() {
        Ok(config) => {
            let result = runner::run(&config).await;
            if let Ok(report) = &result {
                tracing::info!(
                    run_id = %report.run_id,
                    customer_id = %report.customer_id,
                    product_id = %report.product_id,
                    order_id = %report.order_id,
                    order_status = %report.order_status,
                    final_stock = report.final_stock,
                    "Run finished"
                );
            }
            Verdict::from_result(&result)
        }
        Err(e) => Verdict::failed(&e),
    };

    #[allow(clippy::print_stdout)]
    {
        println!("\n{verdict}");
    }
    verdict.exit_code()
}
