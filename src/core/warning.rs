//! Payment urgency classification.
//!
//! Rules are evaluated in priority order and the first match wins, so time pressure
//! always outranks the importance flag: a very important payable that is already past due
//! is reported as overdue. Settled payables never warn.

use super::model::Importance;
use super::reconcile::ReconciledPayable;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Default look-ahead window for the urgent bucket.
pub const DEFAULT_URGENT_WINDOW_DAYS: u32 = 7;

/// Warning bucket a payable falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    /// Past due with a balance outstanding
    Overdue,
    /// Due within the urgent window
    Urgent,
    /// Flagged important or very important
    Important,
    /// No warning
    Normal,
}

impl WarningLevel {
    /// Returns `true` for every level except [`WarningLevel::Normal`].
    #[must_use]
    pub const fn is_warning(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Overdue => "overdue",
            Self::Urgent => "urgent",
            Self::Important => "important",
            Self::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Classifies a reconciled payable relative to `today`.
///
/// Uses the live status: a payable counts as completed once its remaining USD balance is
/// settled, whatever the stored status says. `urgent_window_days` is the inclusive
/// number of days ahead of `today` that still counts as urgent.
#[must_use]
pub fn classify(payable: &ReconciledPayable, today: NaiveDate, urgent_window_days: u32) -> WarningLevel {
    if payable.is_settled() {
        return WarningLevel::Normal;
    }

    if payable.due_date < today {
        return WarningLevel::Overdue;
    }

    let window_end = today
        .checked_add_days(Days::new(u64::from(urgent_window_days)))
        .unwrap_or(NaiveDate::MAX);
    if payable.due_date <= window_end {
        return WarningLevel::Urgent;
    }

    if payable.importance >= Importance::Important {
        return WarningLevel::Important;
    }

    WarningLevel::Normal
}
