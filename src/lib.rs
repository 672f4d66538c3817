//! `ap-tracker` - accounts-payable dashboard core
//!
//! This crate reconciles multi-currency payables against their payment records, classifies
//! them into warning buckets and aggregates bank balances and payment time series into
//! USD-normalised dashboard reports. Ledger data comes from a `SQLite` database or a JSON
//! snapshot; the `ap-tracker` binary prints the reports as JSON.

#![deny(
    unsafe_code,
    unreachable_code,
    unreachable_patterns,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    // Money math runs on f64; comparisons go through an epsilon
    clippy::float_cmp,
    // Per-item failures become issues, never panics
    clippy::expect_used,
    clippy::panic,
    clippy::unwrap_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::cognitive_complexity,
    clippy::too_many_lines,
    clippy::needless_pass_by_value,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,
    rust_2018_idioms,
)]
// `dashboard::DashboardInput` and friends read better fully named; `# Errors` sections
// only where the failure is not obvious from the `Result`
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

// `missing_docs` stays a warning: `DeriveEntityModel` generates undocumented items

/// Command-line interface definitions
pub mod cli;
/// Configuration management for database and report settings
pub mod config;
/// Core business logic - currency conversion, reconciliation, warnings and dashboards
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Ledger data sources - database and JSON snapshot
pub mod source;

#[cfg(test)]
pub mod test_utils;
