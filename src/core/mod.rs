/// Date ranges, granularities and calendar bucketing
pub mod bucketing;
/// Exchange-rate lookup and USD conversion
pub mod currency;
/// Bank, warning and payment-series aggregations
pub mod dashboard;
/// Non-fatal per-item problems reported next to results
pub mod issues;
/// Canonical ledger records
pub mod model;
/// Payable reconciliation against payment records
pub mod reconcile;
/// Async report generation over a ledger source
pub mod report;
/// Warning-bucket classification
pub mod warning;
