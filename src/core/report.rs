//! Report generation.
//!
//! Async glue between a [`LedgerSource`] and the pure aggregation functions: each function
//! fetches what its report needs, then hands the rows to [`crate::core::dashboard`]. All
//! results are plain serializable structs ready to be rendered by a presentation layer.

use crate::{
    core::{
        bucketing::{DateRange, Granularity},
        currency::RateTable,
        dashboard::{
            BankSummary, Dashboard, DashboardOptions, PayablesWarningSummary, PaymentSeriesSummary,
            bank_summary, build_dashboard, payables_warning_summary, payment_series_summary,
        },
        issues::Issue,
        model::PayableStatus,
        reconcile::{ReconciledPayable, reconcile, reconcile_all},
        warning::{WarningLevel, classify},
    },
    errors::{Error, Result},
    source::{LedgerData, LedgerSource},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Reconciliation detail for a single payable.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableReport {
    /// Reconciled totals, rounded to cents
    #[serde(flatten)]
    pub payable: ReconciledPayable,
    /// Live status as of the report date
    pub status: PayableStatus,
    /// Warning bucket as of the report date
    pub warning: WarningLevel,
    /// Days until due; negative when past due
    pub days_until_due: i64,
    /// Problems found in its payments or rates
    pub issues: Vec<Issue>,
}

/// Logs each data issue of a finished report once.
fn log_issues(issues: &[Issue]) {
    for issue in issues {
        warn!(%issue, "Data issue");
    }
}

/// Generates the bank account summary.
#[instrument(skip(source))]
pub async fn generate_bank_summary<S: LedgerSource>(source: &S) -> Result<BankSummary> {
    let (currencies, accounts, balances) = tokio::try_join!(
        source.currency_rates(),
        source.bank_accounts(),
        source.bank_account_balances(),
    )?;

    let rates = RateTable::from_rates(&currencies);
    let summary = bank_summary(&accounts, &balances, &rates);
    log_issues(&summary.issues);
    info!(accounts = summary.aggregate.account_count, "Generated bank summary");
    Ok(summary)
}

/// Generates the payables warning summary as of `today`.
#[instrument(skip(source))]
pub async fn generate_warning_summary<S: LedgerSource>(
    source: &S,
    today: NaiveDate,
    urgent_window_days: u32,
) -> Result<PayablesWarningSummary> {
    let (currencies, payables, payments) = tokio::try_join!(
        source.currency_rates(),
        source.payables(),
        source.payment_records(None),
    )?;

    let rates = RateTable::from_rates(&currencies);
    let reconciled = reconcile_all(&payables, &payments, &rates);
    let summary = payables_warning_summary(&reconciled, today, urgent_window_days);
    log_issues(&summary.issues);
    info!(
        overdue = summary.summary.overdue.count,
        urgent = summary.summary.urgent.count,
        important = summary.summary.important.count,
        "Generated payables warning summary"
    );
    Ok(summary)
}

/// Generates the payment time series for `range`.
#[instrument(skip(source))]
pub async fn generate_payment_series<S: LedgerSource>(
    source: &S,
    range: DateRange,
    granularity: Granularity,
) -> Result<PaymentSeriesSummary> {
    let (currencies, payables, payments) = tokio::try_join!(
        source.currency_rates(),
        source.payables(),
        source.payment_records(None),
    )?;

    let rates = RateTable::from_rates(&currencies);
    let summary = payment_series_summary(&payments, &payables, &rates, range, granularity);
    log_issues(&summary.issues);
    info!(
        payments = summary.payment_count,
        periods = summary.timeseries.len(),
        "Generated payment series"
    );
    Ok(summary)
}

/// Generates every dashboard report from a single fetch of the feeds.
#[instrument(skip(source))]
pub async fn generate_dashboard<S: LedgerSource>(source: &S, options: DashboardOptions) -> Result<Dashboard> {
    let data = LedgerData::fetch(source).await?;
    let dashboard = build_dashboard(data.as_input(), options);
    log_issues(&dashboard.issues);
    info!(issues = dashboard.issues.len(), "Generated dashboard");
    Ok(dashboard)
}

/// Reconciles a single payable against its payment history.
///
/// # Errors
/// Returns [`Error::PayableNotFound`] if no payable has this id and [`Error::Reconcile`]
/// if the payable's own amount is malformed.
#[instrument(skip(source))]
pub async fn generate_payable_report<S: LedgerSource>(
    source: &S,
    payable_id: i64,
    today: NaiveDate,
    urgent_window_days: u32,
) -> Result<PayableReport> {
    let (currencies, payable, payments) = tokio::try_join!(
        source.currency_rates(),
        source.payable(payable_id),
        source.payment_records(Some(payable_id)),
    )?;
    let payable = payable.ok_or(Error::PayableNotFound { id: payable_id })?;

    let rates = RateTable::from_rates(&currencies);
    let reconciliation = reconcile(&payable, &payments, &rates)?;
    let reconciled = reconciliation.payable;
    log_issues(&reconciliation.issues);

    Ok(PayableReport {
        status: reconciled.live_status(today),
        warning: classify(&reconciled, today, urgent_window_days),
        days_until_due: reconciled.days_until_due(today),
        payable: reconciled.rounded(),
        issues: reconciliation.issues,
    })
}
