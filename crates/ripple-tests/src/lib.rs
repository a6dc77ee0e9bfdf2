//! Integration test infrastructure for Ripple CI.
//!
//! This crate provides testcontainers-based infrastructure for running
//! integration tests against a real PostgreSQL server.
//!
//! # Usage
//!
//! ```ignore
//! use ripple_tests::TestContext;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let ctx = TestContext::new().await.unwrap();
//!     let plans = ctx.plans();
//! }
//! ```

pub mod containers;
pub mod context;
pub mod fixtures;
pub mod helpers;

pub use context::TestContext;
pub use fixtures::*;
pub use helpers::*;

/// Initialize test logging (call once per test binary).
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,ripple_core=debug,ripple_db=debug")),
        )
        .with_test_writer()
        .try_init();
}
