//! Non-fatal problems found while aggregating.
//!
//! A missing exchange rate or a malformed record never aborts a report. The affected value
//! falls back to a defined default and an [`Issue`] is attached to the result so callers can
//! flag the data instead of silently trusting it.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Which kind of record carried a malformed amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A payment record amount
    PaymentRecord,
    /// A bank balance breakdown row
    BankBalance,
    /// A bank account's stored current balance
    BankAccount,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PaymentRecord => "payment record",
            Self::BankBalance => "bank balance",
            Self::BankAccount => "bank account",
        };
        f.write_str(name)
    }
}

/// A per-item problem reported next to a result.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Issue {
    /// A currency had no usable rate; amounts were converted at 1.0
    #[serde(rename_all = "camelCase")]
    MissingRate {
        /// Upper-cased currency code
        currency: String,
    },
    /// A record's amount was not a finite number and was treated as zero
    #[serde(rename_all = "camelCase")]
    MalformedAmount {
        /// Record type
        kind: RecordKind,
        /// Record id
        id: i64,
    },
    /// A payable could not be reconciled and was left out of the report
    #[serde(rename_all = "camelCase")]
    UnreconcilablePayable {
        /// Payable id
        payable_id: i64,
        /// Why it was skipped
        reason: String,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRate { currency } => {
                write!(f, "no exchange rate for {currency}, converted at 1.0")
            }
            Self::MalformedAmount { kind, id } => {
                write!(f, "{kind} {id} has a non-numeric amount, treated as 0")
            }
            Self::UnreconcilablePayable { payable_id, reason } => {
                write!(f, "payable {payable_id} skipped: {reason}")
            }
        }
    }
}

/// Ordered, deduplicated set of issues.
///
/// Reports reconcile many items against the same rate table, so the same missing rate
/// would otherwise be reported once per record. The log only collects; the report layer
/// logs the final list once per run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssueLog {
    issues: BTreeSet<Issue>,
}

impl IssueLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue; duplicates are dropped.
    pub fn push(&mut self, issue: Issue) {
        self.issues.insert(issue);
    }

    /// Records every issue from another collection.
    pub fn extend<I: IntoIterator<Item = Issue>>(&mut self, issues: I) {
        self.issues.extend(issues);
    }

    /// Returns `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of distinct issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Consumes the log into a sorted list.
    #[must_use]
    pub fn into_vec(self) -> Vec<Issue> {
        self.issues.into_iter().collect()
    }
}

/// Returns the amount if it is a finite number, otherwise 0 with an issue recorded.
pub fn coerce_amount(amount: f64, kind: RecordKind, id: i64, log: &mut IssueLog) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        log.push(Issue::MalformedAmount { kind, id });
        0.0
    }
}
