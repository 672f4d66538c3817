//! Payable reconciliation.
//!
//! Merges a payable's payment history into paid and remaining totals. Payments may be in
//! any currency: they are grouped by currency, each group's native sum is converted once,
//! and the USD sums are added. The native `total_paid` only counts payments made in the
//! payable's own currency and is informational; the USD figures are authoritative.

use super::currency::{RateTable, normalize_code, round2};
use super::issues::{Issue, IssueLog, RecordKind, coerce_amount};
use super::model::{Importance, Payable, PayableStatus, PaymentRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Remaining balances below half a cent count as settled.
pub const SETTLED_EPSILON: f64 = 0.005;

/// A payable together with its reconciled totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledPayable {
    /// Payable id
    pub id: i64,
    /// Display key
    pub payable_number: String,
    /// Supplier display name
    pub supplier_name: Option<String>,
    /// Upper-cased currency of the payable
    pub currency_code: String,
    /// Due date
    pub due_date: NaiveDate,
    /// Importance flag
    pub importance: Importance,
    /// Status as stored upstream
    pub stored_status: PayableStatus,
    /// Amount owed in the payable's currency
    pub amount: f64,
    /// Amount owed in USD
    pub payable_amount_usd: f64,
    /// Sum of payments made in the payable's own currency
    pub total_paid: f64,
    /// Sum of all payments, converted to USD
    pub total_paid_usd: f64,
    /// `max(0, amount - total_paid)`
    pub remaining: f64,
    /// `max(0, payable_amount_usd - total_paid_usd)`
    pub remaining_usd: f64,
    /// Number of payment records applied
    pub payment_count: usize,
    /// Date of the most recent payment
    pub last_payment_date: Option<NaiveDate>,
}

impl ReconciledPayable {
    /// `true` once the remaining USD balance is below [`SETTLED_EPSILON`].
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.remaining_usd < SETTLED_EPSILON
    }

    /// Status recomputed from the payment totals; the stored status is ignored.
    #[must_use]
    pub fn live_status(&self, today: NaiveDate) -> PayableStatus {
        if self.is_settled() {
            PayableStatus::Completed
        } else if self.due_date < today {
            PayableStatus::Overdue
        } else if self.total_paid_usd > 0.0 {
            PayableStatus::Partial
        } else {
            PayableStatus::Pending
        }
    }

    /// Days from `today` until the due date; negative when past due.
    #[must_use]
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// Copy with every monetary field rounded to cents, for presentation.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            amount: round2(self.amount),
            payable_amount_usd: round2(self.payable_amount_usd),
            total_paid: round2(self.total_paid),
            total_paid_usd: round2(self.total_paid_usd),
            remaining: round2(self.remaining),
            remaining_usd: round2(self.remaining_usd),
            ..self.clone()
        }
    }
}

/// Outcome of reconciling one payable.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconciliation {
    /// The reconciled payable
    pub payable: ReconciledPayable,
    /// Problems found in its payment records or rates
    pub issues: Vec<Issue>,
}

/// Why a payable could not be reconciled at all.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The payable's own amount is not a finite number
    #[error("payable {id} has a non-numeric amount")]
    MalformedPayableAmount {
        /// Payable id
        id: i64,
    },
}

impl ReconcileError {
    /// Converts the error into the issue reported by aggregators.
    #[must_use]
    pub fn into_issue(self) -> Issue {
        match self {
            Self::MalformedPayableAmount { id } => Issue::UnreconcilablePayable {
                payable_id: id,
                reason: "non-numeric amount".to_string(),
            },
        }
    }
}

/// Reconciles `payable` against the payment records that reference it.
///
/// Records for other payables are ignored. Malformed payment amounts count as zero and are
/// reported. With no matching payments, nothing is paid and the full amount remains.
///
/// # Errors
/// Returns [`ReconcileError::MalformedPayableAmount`] when the payable's own amount is
/// not a finite number; there is no meaningful remaining balance in that case.
pub fn reconcile(
    payable: &Payable,
    payments: &[PaymentRecord],
    rates: &RateTable,
) -> Result<Reconciliation, ReconcileError> {
    reconcile_records(payable, payments.iter(), rates)
}

fn reconcile_records<'a, I>(
    payable: &Payable,
    payments: I,
    rates: &RateTable,
) -> Result<Reconciliation, ReconcileError>
where
    I: IntoIterator<Item = &'a PaymentRecord>,
{
    if !payable.amount.is_finite() {
        return Err(ReconcileError::MalformedPayableAmount { id: payable.id });
    }

    let mut log = IssueLog::new();
    let currency_code = normalize_code(&payable.currency_code);

    // ordered so the USD sum is accumulated in the same order on every call
    let mut native_by_currency: BTreeMap<String, f64> = BTreeMap::new();
    let mut payment_count = 0;
    let mut last_payment_date: Option<NaiveDate> = None;

    for record in payments.into_iter().filter(|r| r.payable_id == payable.id) {
        payment_count += 1;
        last_payment_date = last_payment_date.max(Some(record.payment_date));

        let amount = coerce_amount(record.amount, RecordKind::PaymentRecord, record.id, &mut log);
        *native_by_currency
            .entry(normalize_code(&record.currency_code))
            .or_insert(0.0) += amount;
    }

    let mut total_paid_usd = 0.0;
    for (code, native_sum) in &native_by_currency {
        let conversion = rates.convert(*native_sum, code);
        if conversion.fallback_rate {
            log.push(Issue::MissingRate {
                currency: code.clone(),
            });
        }
        total_paid_usd += conversion.usd;
    }
    let total_paid = native_by_currency
        .get(&currency_code)
        .copied()
        .unwrap_or(0.0);

    let payable_conversion = rates.convert(payable.amount, &currency_code);
    if payable_conversion.fallback_rate {
        log.push(Issue::MissingRate {
            currency: currency_code.clone(),
        });
    }
    let payable_amount_usd = payable_conversion.usd;

    Ok(Reconciliation {
        payable: ReconciledPayable {
            id: payable.id,
            payable_number: payable.payable_number.clone(),
            supplier_name: payable.supplier_name.clone(),
            currency_code,
            due_date: payable.due_date,
            importance: payable.importance,
            stored_status: payable.status,
            amount: payable.amount,
            payable_amount_usd,
            total_paid,
            total_paid_usd,
            remaining: (payable.amount - total_paid).max(0.0),
            remaining_usd: (payable_amount_usd - total_paid_usd).max(0.0),
            payment_count,
            last_payment_date,
        },
        issues: log.into_vec(),
    })
}

/// Every payable reconciled, plus the issues collected along the way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconciledSet {
    /// Successfully reconciled payables, in input order
    pub payables: Vec<ReconciledPayable>,
    /// Problems found, including payables that had to be skipped
    pub issues: IssueLog,
}

/// Reconciles every payable. A payable that fails is skipped and reported; its siblings
/// are unaffected.
#[must_use]
pub fn reconcile_all(
    payables: &[Payable],
    payments: &[PaymentRecord],
    rates: &RateTable,
) -> ReconciledSet {
    let mut by_payable: HashMap<i64, Vec<&PaymentRecord>> = HashMap::new();
    for record in payments {
        by_payable.entry(record.payable_id).or_default().push(record);
    }

    let mut set = ReconciledSet::default();
    for payable in payables {
        let records = by_payable.get(&payable.id).map_or(&[][..], Vec::as_slice);
        match reconcile_records(payable, records.iter().copied(), rates) {
            Ok(reconciliation) => {
                set.issues.extend(reconciliation.issues);
                set.payables.push(reconciliation.payable);
            }
            Err(e) => set.issues.push(e.into_issue()),
        }
    }
    set
}
