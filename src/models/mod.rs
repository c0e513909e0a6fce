//! Domain models for the checkout core.
//!
//! These types are shared across all modules: catalog, engine, simulator, and report.

pub mod payment;
pub mod checkout;
pub mod report;
