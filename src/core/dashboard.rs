//! Dashboard aggregation.
//!
//! Builds the three dashboard reports from already-fetched rows:
//!
//! - the bank summary (per-account and portfolio balances in USD),
//! - the payables warning summary (overdue / urgent / important buckets),
//! - the payment time series (per-period and per-payable USD totals).
//!
//! Every function here is pure. Sums are accumulated unrounded; values are rounded to
//! cents only when the summary structs are built.

use super::bucketing::{DateRange, Granularity, bucket, group_by_key};
use super::currency::{RateTable, normalize_code, round2};
use super::issues::{Issue, IssueLog, RecordKind, coerce_amount};
use super::model::{BalanceStatus, BankAccount, BankAccountBalance, CurrencyRate, Payable, PayableStatus, PaymentRecord};
use super::reconcile::{ReconciledPayable, ReconciledSet, reconcile_all};
use super::warning::{WarningLevel, classify};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Bank summary
// ---------------------------------------------------------------------------

/// Balances of one bank account.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    /// Bank account id
    pub account_id: i64,
    /// Account display name
    pub account_name: String,
    /// Bank display name
    pub bank_name: String,
    /// Upper-cased account currency
    pub currency_code: String,
    /// `available + unavailable`, native
    pub total: f64,
    /// Available funds, native
    pub available: f64,
    /// Unavailable funds, native
    pub unavailable: f64,
    /// Pending and frozen rows, native; not part of `total`
    pub other: f64,
    /// `total` in USD
    pub total_usd: f64,
    /// `available` in USD
    pub available_usd: f64,
    /// `unavailable` in USD
    pub unavailable_usd: f64,
    /// `false` when the account had no balance rows and its stored balance was used
    pub has_breakdown: bool,
}

/// Portfolio totals over every active account.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAggregate {
    /// Sum of account totals in USD
    pub total_usd: f64,
    /// Sum of available funds in USD
    pub available_usd: f64,
    /// Sum of unavailable funds in USD
    pub unavailable_usd: f64,
    /// Number of accounts included
    pub account_count: usize,
}

/// Bank summary report.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSummary {
    /// One entry per active account, ordered by bank, account name and id
    pub items: Vec<AccountSummary>,
    /// Portfolio totals
    pub aggregate: BankAggregate,
    /// Problems found while summing
    pub issues: Vec<Issue>,
}

/// Summarises the balances of every active bank account in USD.
///
/// Available and Unavailable rows are summed into their buckets; Pending and Frozen rows
/// are reported as `other`. An account with no balance rows at all falls back to its
/// stored current balance as available, so it does not show a false zero. Rows for unknown
/// or inactive accounts are ignored.
#[must_use]
pub fn bank_summary(
    accounts: &[BankAccount],
    balances: &[BankAccountBalance],
    rates: &RateTable,
) -> BankSummary {
    let mut log = IssueLog::new();

    let mut rows_by_account: HashMap<i64, Vec<&BankAccountBalance>> = HashMap::new();
    for row in balances {
        rows_by_account.entry(row.account_id).or_default().push(row);
    }

    let mut active: Vec<&BankAccount> = accounts.iter().filter(|a| a.is_active).collect();
    active.sort_by(|a, b| {
        a.bank_name
            .cmp(&b.bank_name)
            .then_with(|| a.account_name.cmp(&b.account_name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut items = Vec::with_capacity(active.len());
    let mut aggregate = BankAggregate::default();

    for account in active {
        let currency_code = normalize_code(&account.currency_code);
        let rows = rows_by_account.get(&account.id);
        let has_breakdown = rows.is_some_and(|r| !r.is_empty());

        let (mut available, mut unavailable, mut other) = (0.0, 0.0, 0.0);
        if let Some(rows) = rows.filter(|_| has_breakdown) {
            for row in rows {
                let amount = coerce_amount(row.balance, RecordKind::BankBalance, row.id, &mut log);
                match row.status {
                    BalanceStatus::Available => available += amount,
                    BalanceStatus::Unavailable => unavailable += amount,
                    BalanceStatus::Pending | BalanceStatus::Frozen => other += amount,
                }
            }
        } else {
            available = coerce_amount(account.current_balance, RecordKind::BankAccount, account.id, &mut log);
        }
        let total = available + unavailable;

        let lookup = rates.rate(&currency_code);
        if lookup.fallback {
            log.push(Issue::MissingRate {
                currency: currency_code.clone(),
            });
        }
        let available_usd = rates.convert(available, &currency_code).usd;
        let unavailable_usd = rates.convert(unavailable, &currency_code).usd;
        let total_usd = available_usd + unavailable_usd;

        aggregate.total_usd += total_usd;
        aggregate.available_usd += available_usd;
        aggregate.unavailable_usd += unavailable_usd;
        aggregate.account_count += 1;

        items.push(AccountSummary {
            account_id: account.id,
            account_name: account.account_name.clone(),
            bank_name: account.bank_name.clone(),
            currency_code,
            total: round2(total),
            available: round2(available),
            unavailable: round2(unavailable),
            other: round2(other),
            total_usd: round2(total_usd),
            available_usd: round2(available_usd),
            unavailable_usd: round2(unavailable_usd),
            has_breakdown,
        });
    }

    BankSummary {
        items,
        aggregate: BankAggregate {
            total_usd: round2(aggregate.total_usd),
            available_usd: round2(aggregate.available_usd),
            unavailable_usd: round2(aggregate.unavailable_usd),
            account_count: aggregate.account_count,
        },
        issues: log.into_vec(),
    }
}

// ---------------------------------------------------------------------------
// Payables warning summary
// ---------------------------------------------------------------------------

/// A payable in one of the warning buckets.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarnedPayable {
    /// Reconciled totals, rounded to cents
    #[serde(flatten)]
    pub payable: ReconciledPayable,
    /// Live status as of the report date
    pub status: PayableStatus,
    /// Bucket the payable was classified into
    pub warning: WarningLevel,
    /// Days until due; negative when past due
    pub days_until_due: i64,
}

/// Count and outstanding amount of one bucket.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketTotals {
    /// Number of payables in the bucket
    pub count: usize,
    /// Sum of their remaining USD balances
    pub total_usd: f64,
}

/// Per-bucket totals.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WarningBuckets {
    /// Past due
    pub overdue: BucketTotals,
    /// Due within the urgent window
    pub urgent: BucketTotals,
    /// Important but not yet urgent
    pub important: BucketTotals,
}

/// Payables warning report.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayablesWarningSummary {
    /// Date the classification was made for
    pub as_of: NaiveDate,
    /// Look-ahead used for the urgent bucket
    pub urgent_window_days: u32,
    /// Warned payables: overdue first, then urgent, then important
    pub payables: Vec<WarnedPayable>,
    /// Bucket totals
    pub summary: WarningBuckets,
    /// Problems found while reconciling
    pub issues: Vec<Issue>,
}

/// Classifies every open payable and totals the warning buckets.
///
/// Settled payables are skipped. Within a bucket payables are ordered by due date, then by
/// importance (most important first), then by payable number.
#[must_use]
pub fn payables_warning_summary(
    reconciled: &ReconciledSet,
    today: NaiveDate,
    urgent_window_days: u32,
) -> PayablesWarningSummary {
    let mut warned: Vec<(WarningLevel, &ReconciledPayable)> = reconciled
        .payables
        .iter()
        .filter(|p| !p.is_settled())
        .map(|p| (classify(p, today, urgent_window_days), p))
        .filter(|(level, _)| level.is_warning())
        .collect();

    warned.sort_by(|(la, a), (lb, b)| {
        la.cmp(lb)
            .then_with(|| a.due_date.cmp(&b.due_date))
            .then_with(|| b.importance.cmp(&a.importance))
            .then_with(|| a.payable_number.cmp(&b.payable_number))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut overdue_usd = 0.0;
    let mut urgent_usd = 0.0;
    let mut important_usd = 0.0;
    let mut summary = WarningBuckets::default();
    for (level, payable) in &warned {
        let (bucket, sum) = match level {
            WarningLevel::Overdue => (&mut summary.overdue, &mut overdue_usd),
            WarningLevel::Urgent => (&mut summary.urgent, &mut urgent_usd),
            WarningLevel::Important => (&mut summary.important, &mut important_usd),
            WarningLevel::Normal => continue,
        };
        bucket.count += 1;
        *sum += payable.remaining_usd;
    }
    summary.overdue.total_usd = round2(overdue_usd);
    summary.urgent.total_usd = round2(urgent_usd);
    summary.important.total_usd = round2(important_usd);

    let payables = warned
        .into_iter()
        .map(|(warning, p)| WarnedPayable {
            payable: p.rounded(),
            status: p.live_status(today),
            warning,
            days_until_due: p.days_until_due(today),
        })
        .collect();

    PayablesWarningSummary {
        as_of: today,
        urgent_window_days,
        payables,
        summary,
        issues: reconciled.issues.clone().into_vec(),
    }
}

// ---------------------------------------------------------------------------
// Payment time series
// ---------------------------------------------------------------------------

/// A payment inside the report range.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPayment {
    /// Payment record id
    pub id: i64,
    /// Payable the payment was applied to
    pub payable_id: i64,
    /// Display key of that payable, if it is known
    pub payable_number: Option<String>,
    /// Native amount (0 when malformed)
    pub amount: f64,
    /// Upper-cased payment currency
    pub currency_code: String,
    /// Amount in USD
    pub amount_usd: f64,
    /// Payment date
    pub payment_date: NaiveDate,
    /// Period key the payment was bucketed into
    pub period: String,
}

/// Payments grouped by payable.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableGroup {
    /// Payable id
    pub payable_id: i64,
    /// Display key, if the payable is known
    pub payable_number: Option<String>,
    /// Supplier name, if the payable is known
    pub supplier_name: Option<String>,
    /// Number of payments in range
    pub count_in_range: usize,
    /// USD paid within the range
    pub sum_in_range_usd: f64,
    /// USD paid over the payable's whole history
    pub sum_all_time_usd: f64,
}

/// One point of the time series.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Period key
    pub period: String,
    /// First day of the period
    pub period_start: NaiveDate,
    /// USD paid in the period
    pub total_usd: f64,
    /// Number of payments in the period
    pub count: usize,
}

/// Payment time-series report.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSeriesSummary {
    /// Inclusive date range covered
    pub range: DateRange,
    /// Bucketing resolution
    pub granularity: Granularity,
    /// USD paid within the range
    pub total_paid_usd: f64,
    /// Number of payments within the range
    pub payment_count: usize,
    /// Payments within the range, by date then id
    pub payments: Vec<SeriesPayment>,
    /// Per-payable totals, largest in-range total first
    pub grouped_by_payable: Vec<PayableGroup>,
    /// Sparse series: periods without payments are omitted
    pub timeseries: Vec<SeriesPoint>,
    /// Problems found while converting
    pub issues: Vec<Issue>,
}

struct ConvertedPayment<'a> {
    record: &'a PaymentRecord,
    amount: f64,
    usd: f64,
}

fn convert_payment<'a>(record: &'a PaymentRecord, rates: &RateTable, log: &mut IssueLog) -> ConvertedPayment<'a> {
    let amount = coerce_amount(record.amount, RecordKind::PaymentRecord, record.id, log);
    let conversion = rates.convert(amount, &record.currency_code);
    if conversion.fallback_rate {
        log.push(Issue::MissingRate {
            currency: normalize_code(&record.currency_code),
        });
    }
    ConvertedPayment {
        record,
        amount,
        usd: conversion.usd,
    }
}

/// Buckets the payments made within `range` by period and by payable.
///
/// Every record is converted to USD on its own before summing, so two payments in the
/// same period but different currencies land in one bucket. `payments` may contain records
/// outside the range; they only contribute to each payable's all-time total.
#[must_use]
pub fn payment_series_summary(
    payments: &[PaymentRecord],
    payables: &[Payable],
    rates: &RateTable,
    range: DateRange,
    granularity: Granularity,
) -> PaymentSeriesSummary {
    let mut log = IssueLog::new();
    let payable_index: HashMap<i64, &Payable> = payables.iter().map(|p| (p.id, p)).collect();

    let mut in_range: Vec<ConvertedPayment<'_>> = payments
        .iter()
        .filter(|r| range.contains(r.payment_date))
        .map(|r| convert_payment(r, rates, &mut log))
        .collect();
    in_range.sort_by(|a, b| {
        a.record
            .payment_date
            .cmp(&b.record.payment_date)
            .then_with(|| a.record.id.cmp(&b.record.id))
    });

    let total_paid_usd: f64 = in_range.iter().map(|p| p.usd).sum();

    let timeseries = bucket(&in_range, granularity, |p| p.record.payment_date, |p| p.usd)
        .into_iter()
        .map(|b| SeriesPoint {
            period: b.period,
            period_start: b.period_start,
            total_usd: round2(b.total),
            count: b.count,
        })
        .collect();

    let in_range_groups = group_by_key(&in_range, |p| p.record.payable_id, |p| p.usd);

    // all-time sums only for payables that had activity in range
    let active: HashSet<i64> = in_range_groups.iter().map(|(id, _, _)| *id).collect();
    let history: Vec<ConvertedPayment<'_>> = payments
        .iter()
        .filter(|r| active.contains(&r.payable_id))
        .map(|r| convert_payment(r, rates, &mut log))
        .collect();
    let all_time: HashMap<i64, f64> = group_by_key(&history, |p| p.record.payable_id, |p| p.usd)
        .into_iter()
        .map(|(id, total, _)| (id, total))
        .collect();

    let mut grouped_by_payable: Vec<PayableGroup> = in_range_groups
        .into_iter()
        .map(|(payable_id, in_range_usd, count)| {
            let payable = payable_index.get(&payable_id);
            PayableGroup {
                payable_id,
                payable_number: payable.map(|p| p.payable_number.clone()),
                supplier_name: payable.and_then(|p| p.supplier_name.clone()),
                count_in_range: count,
                sum_in_range_usd: round2(in_range_usd),
                sum_all_time_usd: round2(all_time.get(&payable_id).copied().unwrap_or_default()),
            }
        })
        .collect();
    grouped_by_payable.sort_by(|a, b| {
        b.sum_in_range_usd
            .total_cmp(&a.sum_in_range_usd)
            .then_with(|| a.payable_id.cmp(&b.payable_id))
    });

    let payments_out = in_range
        .iter()
        .map(|p| SeriesPayment {
            id: p.record.id,
            payable_id: p.record.payable_id,
            payable_number: payable_index
                .get(&p.record.payable_id)
                .map(|payable| payable.payable_number.clone()),
            amount: round2(p.amount),
            currency_code: normalize_code(&p.record.currency_code),
            amount_usd: round2(p.usd),
            payment_date: p.record.payment_date,
            period: granularity.period_key(p.record.payment_date),
        })
        .collect::<Vec<_>>();

    PaymentSeriesSummary {
        range,
        granularity,
        total_paid_usd: round2(total_paid_usd),
        payment_count: payments_out.len(),
        payments: payments_out,
        grouped_by_payable,
        timeseries,
        issues: log.into_vec(),
    }
}

// ---------------------------------------------------------------------------
// Combined dashboard
// ---------------------------------------------------------------------------

/// Borrowed view of every feed the dashboard reads.
#[derive(Clone, Copy, Debug, Default)]
pub struct DashboardInput<'a> {
    /// Currency table
    pub currencies: &'a [CurrencyRate],
    /// All payables
    pub payables: &'a [Payable],
    /// All payment records
    pub payments: &'a [PaymentRecord],
    /// All bank accounts
    pub accounts: &'a [BankAccount],
    /// All bank balance rows
    pub balances: &'a [BankAccountBalance],
}

/// Report parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Report date
    pub today: NaiveDate,
    /// Look-ahead for the urgent bucket
    pub urgent_window_days: u32,
    /// Payment series range
    pub range: DateRange,
    /// Payment series resolution
    pub granularity: Granularity,
}

/// Counts of payables by live status, plus the open balance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayablesOverview {
    /// Payables that could be reconciled
    pub payable_count: usize,
    /// Payables with a balance outstanding
    pub open_count: usize,
    /// Sum of outstanding USD balances
    pub open_remaining_usd: f64,
    /// Live status `pending`
    pub pending: usize,
    /// Live status `partial`
    pub partial: usize,
    /// Live status `overdue`
    pub overdue: usize,
    /// Live status `completed`
    pub completed: usize,
}

/// Overview of reconciled payables as of `today`.
#[must_use]
pub fn payables_overview(payables: &[ReconciledPayable], today: NaiveDate) -> PayablesOverview {
    let mut overview = PayablesOverview {
        payable_count: payables.len(),
        ..PayablesOverview::default()
    };
    let mut open_remaining_usd = 0.0;
    for payable in payables {
        match payable.live_status(today) {
            PayableStatus::Pending => overview.pending += 1,
            PayableStatus::Partial => overview.partial += 1,
            PayableStatus::Overdue => overview.overdue += 1,
            PayableStatus::Completed => overview.completed += 1,
        }
        if !payable.is_settled() {
            overview.open_count += 1;
            open_remaining_usd += payable.remaining_usd;
        }
    }
    overview.open_remaining_usd = round2(open_remaining_usd);
    overview
}

/// Every dashboard report in one document.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Report date
    pub as_of: NaiveDate,
    /// Payables by live status
    pub overview: PayablesOverview,
    /// Bank balances
    pub bank: BankSummary,
    /// Warning buckets
    pub warnings: PayablesWarningSummary,
    /// Payment series
    pub payments: PaymentSeriesSummary,
    /// Every distinct issue from the three reports
    pub issues: Vec<Issue>,
}

/// Builds every dashboard report from one set of feeds.
#[must_use]
pub fn build_dashboard(input: DashboardInput<'_>, options: DashboardOptions) -> Dashboard {
    let rates = RateTable::from_rates(input.currencies);
    let mut log = IssueLog::new();

    let reconciled = reconcile_all(input.payables, input.payments, &rates);
    let overview = payables_overview(&reconciled.payables, options.today);
    let bank = bank_summary(input.accounts, input.balances, &rates);
    let warnings = payables_warning_summary(&reconciled, options.today, options.urgent_window_days);
    let payments = payment_series_summary(
        input.payments,
        input.payables,
        &rates,
        options.range,
        options.granularity,
    );

    log.extend(bank.issues.iter().cloned());
    log.extend(warnings.issues.iter().cloned());
    log.extend(payments.issues.iter().cloned());

    Dashboard {
        as_of: options.today,
        overview,
        bank,
        warnings,
        payments,
        issues: log.into_vec(),
    }
}
