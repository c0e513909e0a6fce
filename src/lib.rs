//! Top-up Checkout — Shared Library
//!
//! Payment channel scoring and the fallback flow behind the storefront's
//! checkout page, plus the mock catalog and health feed the storefront
//! runs against.
//!
//! Each serverless function in `api/` imports from this library
//! to keep handlers thin and logic reusable.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod report;
pub mod simulator;
pub mod telemetry;

pub use errors::{CheckoutError, Result};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
